//! drawsynth CLI: live playback, offline rendering and SFZ export.
//!
//! Usage:
//!   drawsynth play --synth wavetable --patch patch.toml --keys 0,4,7
//!   drawsynth render --synth plucked --keys 0 -o pluck.wav
//!   drawsynth export --patch patch.toml --out samples/
//!   drawsynth synths
//!   drawsynth init-patch patch.toml

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use ds_core::VOICE_COUNT;
use ds_engine::{create_algorithm, SynthKind};
use ds_master::{Buttons, Controller, Patch, RenderRequest, KONAMI_SEQUENCE};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

#[derive(Parser)]
#[command(name = "drawsynth")]
#[command(author, version, about = "Drawn-wavetable synthesizer with SFZ export", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play held keys through the default audio device
    Play(PlayArgs),

    /// Render held keys to a WAV file
    Render(RenderArgs),

    /// Capture every MIDI note into WAV files plus an SFZ instrument
    Export(ExportArgs),

    /// List the synth bank
    Synths(PatchArg),

    /// Write the default patch
    InitPatch(InitPatchArgs),
}

#[derive(Args)]
struct PatchArg {
    /// Patch file (TOML); defaults are used when omitted
    #[arg(short, long)]
    patch: Option<PathBuf>,
}

#[derive(Args)]
struct PlayArgs {
    #[command(flatten)]
    patch: PatchArg,

    /// Synth to play
    #[arg(short, long, default_value = "wavetable", value_parser = parse_synth)]
    synth: SynthKind,

    /// Piano keys (0-12) to hold, relative to the root note
    #[arg(short, long, value_delimiter = ',', default_value = "0")]
    keys: Vec<usize>,

    /// How long to hold the keys
    #[arg(long, default_value_t = 2.0)]
    seconds: f32,

    /// Enter the export gesture once playback starts
    #[arg(long, requires = "export_dir")]
    konami: bool,

    /// Where the export gesture writes its files
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    patch: PatchArg,

    #[arg(short, long, default_value = "wavetable", value_parser = parse_synth)]
    synth: SynthKind,

    #[arg(short, long, value_delimiter = ',', default_value = "0")]
    keys: Vec<usize>,

    /// Hold time in seconds
    #[arg(long, default_value_t = 1.0)]
    seconds: f32,

    /// Release tail in seconds
    #[arg(long, default_value_t = 0.1)]
    tail: f32,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    patch: PatchArg,

    /// Synth to capture; only exportable synths succeed
    #[arg(short, long, default_value = "wavetable", value_parser = parse_synth)]
    synth: SynthKind,

    /// Output directory
    #[arg(short, long, default_value = "export")]
    out: PathBuf,
}

#[derive(Args)]
struct InitPatchArgs {
    /// Destination file
    path: PathBuf,

    /// Replace an existing file
    #[arg(short, long)]
    force: bool,
}

fn parse_synth(s: &str) -> Result<SynthKind, String> {
    SynthKind::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = SynthKind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown synth '{s}', expected one of: {}", names.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .init();

    match cli.command {
        Commands::Play(args) => play(args),
        Commands::Render(args) => render(args),
        Commands::Export(args) => export(args),
        Commands::Synths(args) => synths(args),
        Commands::InitPatch(args) => init_patch(args),
    }
}

fn controller(arg: &PatchArg) -> anyhow::Result<Controller> {
    let mut ctrl = Controller::new();
    if let Some(path) = &arg.patch {
        ctrl.load_patch(path)
            .with_context(|| format!("loading patch {}", path.display()))?;
    }
    Ok(ctrl)
}

fn check_keys(keys: &[usize]) -> anyhow::Result<()> {
    if let Some(key) = keys.iter().find(|&&k| k >= VOICE_COUNT) {
        bail!("key {key} is out of range, the piano has keys 0-{}", VOICE_COUNT - 1);
    }
    Ok(())
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    check_keys(&args.keys)?;
    let mut ctrl = controller(&args.patch)?;
    ctrl.set_export_dir(args.export_dir.clone());
    ctrl.play(args.synth)?;
    info!(keys = ?args.keys, "holding keys");

    if args.konami {
        for step in KONAMI_SEQUENCE {
            ctrl.buttons(step, Buttons::NONE);
            ctrl.buttons(Buttons::NONE, step);
        }
    }
    for &key in &args.keys {
        ctrl.press_key(key);
    }

    let hold = Duration::from_secs_f32(args.seconds.max(0.0));
    let started = Instant::now();
    while ctrl.is_playing() && started.elapsed() < hold {
        print!("\rframes: {}", ctrl.frames_rendered());
        let _ = std::io::stdout().flush();
        std::thread::sleep(Duration::from_millis(50));
    }
    println!();

    if !ctrl.is_playing() {
        bail!("audio playback ended early, see the log for the device error");
    }
    for &key in &args.keys {
        ctrl.release_key(key);
    }
    // Release tail
    std::thread::sleep(Duration::from_millis(200));
    ctrl.stop();
    Ok(())
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    check_keys(&args.keys)?;
    let ctrl = controller(&args.patch)?;
    let rate = ctrl.patch().synths.get(args.synth).sample_rate as f32;
    let request = RenderRequest {
        synth: args.synth,
        keys: args.keys,
        hold_frames: (args.seconds.max(0.0) * rate) as usize,
        tail_frames: (args.tail.max(0.0) * rate) as usize,
    };

    let wav = ctrl.render_to_wav(&request)?;
    fs::write(&args.output, &wav)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        frames = request.hold_frames + request.tail_frames,
        sample_rate = rate as u32,
        "rendered"
    );
    Ok(())
}

fn export(args: ExportArgs) -> anyhow::Result<()> {
    let ctrl = controller(&args.patch)?;
    let summary = ctrl
        .export_sfz(args.synth, &args.out)
        .with_context(|| format!("exporting {} to {}", args.synth.name(), args.out.display()))?;
    println!(
        "Wrote {} regions ({} samples) to {}",
        summary.regions,
        summary.total_samples,
        summary.sfz_path.display()
    );
    Ok(())
}

fn synths(args: PatchArg) -> anyhow::Result<()> {
    let ctrl = controller(&args)?;
    let settings = ctrl.patch().settings()?;
    println!("{:<10} {:<16} {:>6} {:>8}  export  params", "name", "algorithm", "gain", "rate");
    for kind in SynthKind::ALL {
        let s = settings[kind.index()];
        let algorithm = create_algorithm(kind, s);
        let info = algorithm.info();
        let params: Vec<String> = info
            .params
            .iter()
            .map(|p| format!("{}[{}..={}]", p.name, p.min, p.max))
            .collect();
        println!(
            "{:<10} {:<16} {:>6} {:>8}  {:<6}  {}",
            kind.name(),
            info.name,
            s.gain,
            s.sample_rate,
            if info.exportable { "yes" } else { "no" },
            params.join(" ")
        );
    }
    Ok(())
}

fn init_patch(args: InitPatchArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} exists, pass --force to replace it", args.path.display());
    }
    Patch::default()
        .save(&args.path)
        .with_context(|| format!("writing patch {}", args.path.display()))?;
    println!("Wrote {}", args.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn synth_names_parse() {
        assert_eq!(parse_synth("fm"), Ok(SynthKind::Fm));
        let err = parse_synth("organ").unwrap_err();
        assert!(err.contains("square, wavetable, plucked, novelty, fm"));
    }

    #[test]
    fn keys_are_comma_separated() {
        let cli = Cli::parse_from(["drawsynth", "render", "-k", "0,4,7", "-o", "x.wav"]);
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.keys, [0, 4, 7]);
        assert_eq!(args.synth, SynthKind::Wavetable);
    }

    #[test]
    fn konami_needs_export_dir() {
        assert!(Cli::try_parse_from(["drawsynth", "play", "--konami"]).is_err());
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        assert!(check_keys(&[0, 12]).is_ok());
        assert!(check_keys(&[13]).is_err());
    }
}
