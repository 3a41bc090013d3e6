//! Headless controller for drawsynth.
//!
//! Owns the current patch and provides the live playback, offline render
//! and SFZ export paths that the CLI drives.

mod export;
mod patch;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use ds_audio::{AudioError, AudioOutput, CpalOutput, HoldResampler};
use ds_engine::{Engine, INPUT_QUEUE_CAPACITY};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tracing::{debug, error, info, warn};

pub use ds_core::{Buttons, PianoKeys, KONAMI_SEQUENCE};
pub use ds_engine::{CaptureError, Frame, InputEvent, SynthKind};
pub use ds_formats::FormatError;
pub use export::{export_sfz, ExportError, ExportSummary, SFZ_FILE_NAME};
pub use patch::{
    FmPatch, NoveltyPatch, OutputPatch, Patch, PatchError, PluckedPatch, SynthsPatch,
    WavetablePatch,
};

/// A note sequence for offline rendering: hold `keys` for `hold_frames`,
/// release them, then keep rendering the release tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub synth: SynthKind,
    pub keys: Vec<usize>,
    pub hold_frames: usize,
    pub tail_frames: usize,
}

/// Headless controller: owns a patch and manages playback.
pub struct Controller {
    patch: Patch,
    export_dir: Option<PathBuf>,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    events: HeapProd<InputEvent>,
    stop_signal: Arc<AtomicBool>,
    frames_rendered: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

/// State moved into the audio thread.
struct LiveSession {
    engine: Engine,
    events: HeapCons<InputEvent>,
    export_dir: Option<PathBuf>,
    stop_signal: Arc<AtomicBool>,
    frames_rendered: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_patch(Patch::default())
    }

    pub fn with_patch(patch: Patch) -> Self {
        Self {
            patch,
            export_dir: None,
            playback: None,
        }
    }

    // --- Patch management ---

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Replace the patch. Takes effect on the next `play`.
    pub fn set_patch(&mut self, patch: Patch) -> Result<(), PatchError> {
        patch.validate()?;
        self.patch = patch;
        Ok(())
    }

    pub fn load_patch(&mut self, path: &Path) -> Result<(), PatchError> {
        self.patch = Patch::load(path)?;
        info!(path = %path.display(), "loaded patch");
        Ok(())
    }

    /// Directory the export gesture writes to during live playback.
    pub fn set_export_dir(&mut self, dir: Option<PathBuf>) {
        self.export_dir = dir;
    }

    /// A fresh engine running the current patch with `synth` selected.
    pub fn build_engine(&self, synth: SynthKind) -> Result<Engine, PatchError> {
        let mut engine = Engine::with_settings(self.patch.parameters()?, self.patch.settings()?);
        engine.select(synth);
        Ok(engine)
    }

    // --- Real-time playback ---

    pub fn play(&mut self, synth: SynthKind) -> Result<(), PatchError> {
        self.stop();

        let engine = self.build_engine(synth)?;
        let (producer, consumer) = HeapRb::<InputEvent>::new(INPUT_QUEUE_CAPACITY).split();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let frames_rendered = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let session = LiveSession {
            engine,
            events: consumer,
            export_dir: self.export_dir.clone(),
            stop_signal: stop_signal.clone(),
            frames_rendered: frames_rendered.clone(),
            finished: finished.clone(),
        };
        let thread = std::thread::spawn(move || audio_thread(session));
        info!(synth = synth.name(), "playback started");

        self.playback = Some(PlaybackHandle {
            events: producer,
            stop_signal,
            frames_rendered,
            finished,
            thread: Some(thread),
        });
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
            info!("playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    /// Synth frames produced by the live engine so far.
    pub fn frames_rendered(&self) -> u64 {
        self.playback
            .as_ref()
            .map_or(0, |p| p.frames_rendered.load(Ordering::Relaxed))
    }

    /// Queue input for the live engine. Returns false when nothing is
    /// playing or the queue is full.
    pub fn send(&mut self, event: InputEvent) -> bool {
        match self.playback.as_mut() {
            Some(pb) if !pb.finished.load(Ordering::Relaxed) => pb.events.try_push(event).is_ok(),
            _ => false,
        }
    }

    pub fn press_key(&mut self, key: usize) -> bool {
        self.send(InputEvent::KeyDown(key))
    }

    pub fn release_key(&mut self, key: usize) -> bool {
        self.send(InputEvent::KeyUp(key))
    }

    pub fn buttons(&mut self, down: Buttons, up: Buttons) -> bool {
        self.send(InputEvent::Buttons { down, up })
    }

    pub fn piano(&mut self, down: PianoKeys, up: PianoKeys) -> bool {
        self.send(InputEvent::Piano { down, up })
    }

    // --- Offline rendering ---

    pub fn render_frames(&self, request: &RenderRequest) -> Result<Vec<Frame>, PatchError> {
        let mut engine = self.build_engine(request.synth)?;
        for &key in &request.keys {
            engine.press_key(key);
        }

        let mut frames = Vec::with_capacity(request.hold_frames + request.tail_frames);
        for _ in 0..request.hold_frames {
            frames.push(engine.render_frame());
        }
        engine.release_all();
        for _ in 0..request.tail_frames {
            frames.push(engine.render_frame());
        }
        Ok(frames)
    }

    /// Render to a mono 16-bit WAV at the synth's own sample rate.
    pub fn render_to_wav(&self, request: &RenderRequest) -> Result<Vec<u8>, ExportError> {
        let sample_rate = self.patch.synths.get(request.synth).sample_rate;
        let samples: Vec<i16> = self
            .render_frames(request)?
            .into_iter()
            .map(Frame::value)
            .collect();
        Ok(ds_formats::samples_to_wav(&samples, sample_rate)?)
    }

    // --- Export ---

    /// Capture all 128 MIDI notes of `synth` into `dir`.
    pub fn export_sfz(&self, synth: SynthKind, dir: &Path) -> Result<ExportSummary, ExportError> {
        let mut engine = self.build_engine(synth)?;
        export::export_sfz(&mut engine, dir)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Move queued input into the engine without overflowing its queue.
fn drain_events(engine: &mut Engine, events: &mut HeapCons<InputEvent>) {
    while engine.pending_events() < INPUT_QUEUE_CAPACITY {
        let Some(event) = events.try_pop() else {
            break;
        };
        if engine.push_event(event).is_err() {
            break;
        }
    }
}

/// Run the export gesture's capture on the audio thread. The device plays
/// silence until it returns.
fn export_on_request(engine: &mut Engine, export_dir: Option<&Path>) {
    let Some(dir) = export_dir else {
        warn!("export requested but no export directory is set");
        return;
    };
    match export::export_sfz(engine, dir) {
        Ok(summary) => info!(path = %summary.sfz_path.display(), "export complete"),
        Err(err) => warn!(%err, "export failed"),
    }
}

fn open_device() -> Result<CpalOutput, AudioError> {
    let (mut output, consumer) = CpalOutput::new()?;
    output.build_stream(consumer)?;
    output.start()?;
    Ok(output)
}

fn audio_thread(mut session: LiveSession) {
    match open_device() {
        Ok(mut output) => {
            run_live(&mut output, &mut session);
            if let Err(err) = output.stop() {
                warn!(%err, "failed to stop audio stream");
            }
        }
        Err(err) => error!(%err, "audio output unavailable"),
    }
    session.finished.store(true, Ordering::Relaxed);
}

/// Feed `output` at its own rate until the stop signal is raised.
fn run_live(output: &mut impl AudioOutput, session: &mut LiveSession) {
    let device_rate = output.sample_rate();
    let mut resampler = HoldResampler::new(device_rate);
    debug!(
        device_rate,
        synth = session.engine.active_kind().name(),
        synth_rate = session.engine.sample_rate(),
        "audio thread running"
    );

    let mut synth_frames: u64 = 0;
    while !session.stop_signal.load(Ordering::Relaxed) {
        drain_events(&mut session.engine, &mut session.events);

        let engine = &mut session.engine;
        let synth_rate = engine.sample_rate();
        let mut pull = || {
            synth_frames += 1;
            engine.render_frame()
        };

        #[cfg(feature = "alloc_check")]
        let frame = assert_no_alloc::assert_no_alloc(|| resampler.next(synth_rate, &mut pull));
        #[cfg(not(feature = "alloc_check"))]
        let frame = resampler.next(synth_rate, &mut pull);

        output.write_frame(frame);
        session.frames_rendered.store(synth_frames, Ordering::Relaxed);

        if session.engine.take_export_request() {
            export_on_request(&mut session.engine, session.export_dir.as_deref());
        }
    }

    // Let the device drain before the stream is dropped
    for _ in 0..device_rate / 10 {
        output.write_frame(Frame::silence());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::{DEPOP_FRAMES, TABLE_LENGTH};
    use ringbuf::traits::Observer;

    fn flat_patch(level: i16) -> Patch {
        let mut patch = Patch::default();
        patch.wavetable.wave1 = vec![level; TABLE_LENGTH];
        patch.wavetable.wave2 = vec![level; TABLE_LENGTH];
        patch
    }

    fn request(keys: Vec<usize>) -> RenderRequest {
        RenderRequest {
            synth: SynthKind::Wavetable,
            keys,
            hold_frames: 500,
            tail_frames: 100,
        }
    }

    #[test]
    fn render_holds_then_releases() {
        let controller = Controller::with_patch(flat_patch(100));
        let frames = controller.render_frames(&request(vec![0])).unwrap();
        assert_eq!(frames.len(), 600);
        assert_eq!(frames[0], Frame(0));
        // Gain 31 on a flat table once the attack is over
        assert_eq!(frames[DEPOP_FRAMES as usize + 10], Frame(3100));
        assert_eq!(frames[599], Frame(0));
    }

    #[test]
    fn render_is_deterministic() {
        let mut patch = Patch::default();
        patch.plucked.burst_fill = "random".into();
        let controller = Controller::with_patch(patch);
        let req = RenderRequest {
            synth: SynthKind::Plucked,
            ..request(vec![0, 4, 7])
        };
        assert_eq!(
            controller.render_frames(&req).unwrap(),
            controller.render_frames(&req).unwrap()
        );
    }

    #[test]
    fn render_to_wav_uses_synth_rate() {
        let controller = Controller::with_patch(flat_patch(50));
        let wav = controller.render_to_wav(&request(vec![0])).unwrap();
        let decoded = ds_formats::load_wav(&wav).unwrap();
        assert_eq!(decoded.sample_rate, 10_000);
        assert_eq!(decoded.samples.len(), 600);
    }

    #[test]
    fn invalid_patch_is_refused() {
        let mut controller = Controller::new();
        let mut patch = Patch::default();
        patch.novelty.fill = "noise".into();
        assert!(controller.set_patch(patch).is_err());
        assert_eq!(controller.patch(), &Patch::default());
    }

    #[test]
    fn input_without_playback_is_dropped() {
        let mut controller = Controller::new();
        assert!(!controller.is_playing());
        assert!(!controller.press_key(0));
        assert_eq!(controller.frames_rendered(), 0);
    }

    #[test]
    fn drain_respects_engine_queue() {
        let mut engine = Engine::default();
        let (mut prod, mut cons) = HeapRb::<InputEvent>::new(INPUT_QUEUE_CAPACITY * 2).split();
        for key in 0..INPUT_QUEUE_CAPACITY + 5 {
            prod.try_push(InputEvent::KeyDown(key % 13)).unwrap();
        }
        drain_events(&mut engine, &mut cons);
        assert_eq!(engine.pending_events(), INPUT_QUEUE_CAPACITY);
        assert_eq!(cons.occupied_len(), 5);
    }

    /// Records everything written and raises the stop signal after
    /// `stop_after` frames.
    struct Recorder {
        rate: u32,
        frames: Vec<Frame>,
        stop_after: usize,
        stop: Arc<AtomicBool>,
    }

    impl AudioOutput for Recorder {
        fn sample_rate(&self) -> u32 {
            self.rate
        }

        fn write_frame(&mut self, frame: Frame) {
            self.frames.push(frame);
            if self.frames.len() == self.stop_after {
                self.stop.store(true, Ordering::Relaxed);
            }
        }

        fn start(&mut self) -> Result<(), AudioError> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), AudioError> {
            Ok(())
        }
    }

    fn live(
        controller: &Controller,
        export_dir: Option<PathBuf>,
        stop_after: usize,
    ) -> (LiveSession, HeapProd<InputEvent>, Recorder) {
        let (producer, consumer) = HeapRb::<InputEvent>::new(INPUT_QUEUE_CAPACITY).split();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let session = LiveSession {
            engine: controller.build_engine(SynthKind::Wavetable).unwrap(),
            events: consumer,
            export_dir,
            stop_signal: stop_signal.clone(),
            frames_rendered: Arc::new(AtomicU64::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        };
        let recorder = Recorder {
            rate: 20_000,
            frames: Vec::new(),
            stop_after,
            stop: stop_signal,
        };
        (session, producer, recorder)
    }

    #[test]
    fn live_loop_holds_frames_at_device_rate() {
        let controller = Controller::with_patch(flat_patch(100));
        let (mut session, mut events, mut output) = live(&controller, None, 2000);
        events.try_push(InputEvent::KeyDown(0)).unwrap();

        run_live(&mut output, &mut session);

        // Wavetable runs at 10 kHz into a 20 kHz device
        assert_eq!(session.frames_rendered.load(Ordering::Relaxed), 1000);
        let played = &output.frames[..2000];
        assert!(played.chunks(2).all(|pair| pair[0] == pair[1]));
        assert!(played.contains(&Frame(3100)));
        // Followed by the drain
        assert_eq!(output.frames.len(), 4000);
        assert!(output.frames[2000..].iter().all(|f| *f == Frame::silence()));
    }

    #[test]
    fn live_export_gesture_writes_instrument() {
        let mut patch = flat_patch(100);
        patch.wavetable.transition_time = 60;
        patch.wavetable.cycle = "loop".into();
        let controller = Controller::with_patch(patch);
        let dir = tempfile::tempdir().unwrap();
        let (mut session, mut events, mut output) =
            live(&controller, Some(dir.path().to_path_buf()), 100);
        for step in KONAMI_SEQUENCE {
            events
                .try_push(InputEvent::Buttons {
                    down: step,
                    up: Buttons::NONE,
                })
                .unwrap();
        }

        run_live(&mut output, &mut session);

        assert!(dir.path().join(SFZ_FILE_NAME).exists());
        assert!(dir.path().join("A4.wav").exists());
    }

    #[test]
    fn export_uses_patch_settings() {
        let mut patch = flat_patch(100);
        patch.wavetable.transition_time = 60;
        patch.wavetable.cycle = "loop".into();
        patch.synths.wavetable.sample_rate = 22_050;
        let controller = Controller::with_patch(patch);

        let dir = tempfile::tempdir().unwrap();
        let summary = controller
            .export_sfz(SynthKind::Wavetable, dir.path())
            .unwrap();
        assert_eq!(summary.regions, 128);
        let wav = std::fs::read(dir.path().join("C3.wav")).unwrap();
        assert_eq!(ds_formats::load_wav(&wav).unwrap().sample_rate, 22_050);
    }
}
