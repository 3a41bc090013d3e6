//! SFZ export to a real directory.

use std::fs;

use ds_core::{TransitionCycle, MIDI_TABLE, TABLE_LENGTH};
use ds_engine::SynthKind;
use ds_formats::load_wav;
use ds_master::{Controller, ExportError, Patch, SFZ_FILE_NAME};

fn ramp_patch(cycle: TransitionCycle) -> Patch {
    let mut patch = Patch::default();
    patch.wavetable.wave1 = (0..TABLE_LENGTH).map(|i| (i * 172 / TABLE_LENGTH) as i16).collect();
    patch.wavetable.wave2 = patch.wavetable.wave1.iter().rev().copied().collect();
    patch.wavetable.transition = patch.wavetable.wave1.clone();
    patch.wavetable.transition_time = 400;
    patch.wavetable.cycle = cycle.name().to_owned();
    patch
}

#[test]
fn forward_export_writes_loopable_samples() {
    let dir = tempfile::tempdir().unwrap();
    let controller = Controller::with_patch(ramp_patch(TransitionCycle::Forward));
    let summary = controller
        .export_sfz(SynthKind::Wavetable, dir.path())
        .unwrap();
    assert_eq!(summary.regions, MIDI_TABLE.len());

    let sfz = fs::read_to_string(dir.path().join(SFZ_FILE_NAME)).unwrap();
    for entry in MIDI_TABLE.iter().step_by(17) {
        let bytes = fs::read(dir.path().join(format!("{}.wav", entry.name))).unwrap();
        // Header data length matches the payload
        let declared = u32::from_le_bytes(bytes[40..44].try_into().unwrap()) as usize;
        assert_eq!(declared, bytes.len() - 44);

        let wav = load_wav(&bytes).unwrap();
        assert_eq!(wav.sample_rate, 10_000);

        let region = sfz
            .lines()
            .find(|l| l.contains(&format!("sample={}.wav ", entry.name)))
            .unwrap();
        assert!(region.contains(&format!("key={}", entry.key)));
        let loop_end: usize = region
            .rsplit("loop_end=")
            .next()
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        // Capture stops one sample past the loop
        assert_eq!(wav.samples.len(), loop_end + 2);
    }
}

#[test]
fn ping_pong_loops_start_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let controller = Controller::with_patch(ramp_patch(TransitionCycle::PingPong));
    controller
        .export_sfz(SynthKind::Wavetable, dir.path())
        .unwrap();
    let sfz = fs::read_to_string(dir.path().join(SFZ_FILE_NAME)).unwrap();
    let regions: Vec<&str> = sfz.lines().filter(|l| l.starts_with("<region>")).collect();
    assert_eq!(regions.len(), 128);
    assert!(regions.iter().all(|r| r.contains("loop_start=0 ")));
}

#[test]
fn fm_export_is_refused_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let controller = Controller::new();
    let err = controller
        .export_sfz(SynthKind::Fm, dir.path())
        .unwrap_err();
    assert!(matches!(err, ExportError::Capture { note: "C-2", .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
