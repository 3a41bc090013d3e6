//! Application root: voices, parameters, the synth bank and input handling.

use alloc::vec::Vec;

use ds_core::{
    decode_piano_mask, Buttons, KonamiDetector, PianoKeys, Ring, SynthParameters, VoiceState,
    VOICE_COUNT,
};
use heapless::Deque;

use crate::algorithms::{SynthKind, SYNTH_COUNT};
use crate::export::{Capture, CaptureError};
use crate::frame::Frame;
use crate::piano::Piano;
use crate::synth::{Synth, SynthSettings};

/// Input is applied this many times per second of synth output.
pub const DISPLAY_RATE: u32 = 60;

/// Pending input events held between display frames.
pub const INPUT_QUEUE_CAPACITY: usize = 64;

/// Voice played by the X-button test tone.
const TEST_TONE_KEY: usize = 0;

/// One scan's worth of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Button edges from the key register.
    Buttons { down: Buttons, up: Buttons },
    /// Key edges from the piano add-on.
    Piano { down: PianoKeys, up: PianoKeys },
    /// A single logical key pressed.
    KeyDown(usize),
    /// A single logical key released.
    KeyUp(usize),
}

/// Owns everything the audio callback touches.
///
/// Input is queued with [`push_event`](Engine::push_event) and applied at
/// the start of every display frame from inside
/// [`render_frame`](Engine::render_frame), so parameter and voice changes
/// always land between samples.
pub struct Engine {
    voices: [VoiceState; VOICE_COUNT],
    params: SynthParameters,
    synths: Vec<Synth>,
    selected: Ring,
    piano: Piano,
    konami: KonamiDetector,
    pending: Deque<InputEvent, INPUT_QUEUE_CAPACITY>,
    frames_until_input: u32,
    export_requested: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SynthParameters::default())
    }
}

impl Engine {
    /// Create an engine with every synth at its default settings.
    pub fn new(params: SynthParameters) -> Self {
        Self::with_settings(params, SynthKind::ALL.map(SynthKind::default_settings))
    }

    /// Create an engine; `settings` is indexed by [`SynthKind::index`].
    pub fn with_settings(params: SynthParameters, settings: [SynthSettings; SYNTH_COUNT]) -> Self {
        Self {
            voices: core::array::from_fn(VoiceState::new),
            params,
            synths: SynthKind::ALL
                .iter()
                .map(|&kind| Synth::new(kind, settings[kind.index()]))
                .collect(),
            selected: Ring::new(SYNTH_COUNT),
            piano: Piano::new(),
            konami: KonamiDetector::new(),
            pending: Deque::new(),
            frames_until_input: 0,
            export_requested: false,
        }
    }

    pub fn params(&self) -> &SynthParameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SynthParameters {
        &mut self.params
    }

    pub fn voices(&self) -> &[VoiceState; VOICE_COUNT] {
        &self.voices
    }

    pub fn piano(&self) -> &Piano {
        &self.piano
    }

    pub fn piano_mut(&mut self) -> &mut Piano {
        &mut self.piano
    }

    /// The synth currently producing output.
    pub fn active(&self) -> &Synth {
        &self.synths[self.selected.current()]
    }

    pub fn active_kind(&self) -> SynthKind {
        self.active().kind()
    }

    /// Output rate of the active synth.
    pub fn sample_rate(&self) -> u32 {
        self.active().sample_rate()
    }

    pub fn synth(&self, kind: SynthKind) -> &Synth {
        &self.synths[kind.index()]
    }

    /// Make `kind` the active synth.
    pub fn select(&mut self, kind: SynthKind) {
        self.selected.select(kind.index());
        self.frames_until_input = 0;
    }

    /// Advance to the next synth of the bank.
    pub fn select_next(&mut self) -> SynthKind {
        self.selected.next();
        self.frames_until_input = 0;
        self.active_kind()
    }

    /// Queue input for the next display frame. Hands the event back when
    /// the queue is full.
    pub fn push_event(&mut self, event: InputEvent) -> Result<(), InputEvent> {
        self.pending.push_back(event)
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// True once after the export gesture completes.
    pub fn take_export_request(&mut self) -> bool {
        core::mem::take(&mut self.export_requested)
    }

    /// Generate one frame of audio.
    pub fn render_frame(&mut self) -> Frame {
        if self.frames_until_input == 0 {
            self.apply_pending();
            self.frames_until_input = (self.sample_rate() / DISPLAY_RATE).max(1);
        }
        self.frames_until_input -= 1;

        let synth = &mut self.synths[self.selected.current()];
        Frame(synth.frame_output(&mut self.voices, &self.params))
    }

    /// Apply every queued event now.
    pub fn apply_pending(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Buttons { down, up } => self.handle_buttons(down, up),
            InputEvent::Piano { down, up } => self.scan_piano(down, up),
            InputEvent::KeyDown(key) => self.press_key(key),
            InputEvent::KeyUp(key) => self.release_key(key),
        }
    }

    /// React to one scan of button edges.
    ///
    /// The export gesture is checked first; its d-pad presses still move
    /// the root like any other.
    pub fn handle_buttons(&mut self, down: Buttons, up: Buttons) {
        if !down.is_empty() && self.konami.next(down) {
            self.export_requested = true;
        }
        if down.contains(Buttons::SELECT) {
            self.select_next();
        }
        if down.contains(Buttons::UP) {
            self.piano.inc_octave();
        }
        if down.contains(Buttons::DOWN) {
            self.piano.dec_octave();
        }
        if down.contains(Buttons::RIGHT) {
            self.piano.inc_pitch();
        }
        if down.contains(Buttons::LEFT) {
            self.piano.dec_pitch();
        }
        if down.contains(Buttons::X) {
            self.press_key(TEST_TONE_KEY);
        }
        if up.contains(Buttons::X) {
            self.release_key(TEST_TONE_KEY);
        }
    }

    /// React to one scan of the piano add-on. A key both pressed and
    /// released in the same scan counts as pressed.
    pub fn scan_piano(&mut self, down: PianoKeys, up: PianoKeys) {
        let pressed = decode_piano_mask(down);
        for &key in &pressed {
            self.press_key(key);
        }
        for key in decode_piano_mask(up) {
            if !pressed.contains(&key) {
                self.release_key(key);
            }
        }
    }

    /// Start logical key `key` (0-12) at the current root.
    pub fn press_key(&mut self, key: usize) {
        if let Some(voice) = self.voices.get_mut(key) {
            self.piano.play_key(voice);
        }
    }

    pub fn release_key(&mut self, key: usize) {
        if let Some(voice) = self.voices.get_mut(key) {
            self.piano.stop_key(voice);
        }
    }

    /// Release every key.
    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            self.piano.stop_key(voice);
        }
    }

    /// True while any voice is sounding or releasing.
    pub fn is_sounding(&self) -> bool {
        self.voices.iter().any(|v| !v.is_silent())
    }

    /// Capture one note from the active synth. See [`Synth::capture`].
    pub fn capture(&mut self, freq: i32) -> Result<Capture, CaptureError> {
        let synth = &mut self.synths[self.selected.current()];
        synth.capture(&self.params, freq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::{KONAMI_SEQUENCE, PIANO_PITCHES, TABLE_LENGTH};

    fn wavetable_engine() -> Engine {
        let mut params = SynthParameters::default();
        params.wavetable.wave1 = [100; TABLE_LENGTH];
        params.wavetable.wave2 = [100; TABLE_LENGTH];
        let mut engine = Engine::new(params);
        engine.select(SynthKind::Wavetable);
        engine
    }

    #[test]
    fn starts_on_square_test_tone() {
        let engine = Engine::default();
        assert_eq!(engine.active_kind(), SynthKind::Square);
        assert_eq!(engine.sample_rate(), 20_000);
    }

    #[test]
    fn select_cycles_bank_in_order() {
        let mut engine = Engine::default();
        let seen: Vec<SynthKind> = (0..SYNTH_COUNT)
            .map(|_| {
                engine.handle_buttons(Buttons::SELECT, Buttons::NONE);
                engine.active_kind()
            })
            .collect();
        assert_eq!(
            seen,
            [
                SynthKind::Wavetable,
                SynthKind::Plucked,
                SynthKind::Novelty,
                SynthKind::Fm,
                SynthKind::Square
            ]
        );
    }

    #[test]
    fn queued_input_waits_for_display_frame() {
        let mut engine = wavetable_engine();
        engine.render_frame();
        engine.push_event(InputEvent::KeyDown(0)).unwrap();

        // 10000 Hz / 60 = 166 frames per display frame
        for _ in 1..166 {
            assert_eq!(engine.render_frame(), Frame::silence());
        }
        assert!(!engine.voices()[0].playing);
        engine.render_frame();
        assert!(engine.voices()[0].playing);
        assert_eq!(engine.pending_events(), 0);
    }

    #[test]
    fn held_key_ramps_in() {
        let mut engine = wavetable_engine();
        engine.press_key(0);
        let frames: Vec<i16> = (0..60).map(|_| engine.render_frame().value()).collect();
        assert_eq!(frames[0], 0);
        assert_eq!(frames[59], 100 * 31);
    }

    #[test]
    fn full_queue_returns_event() {
        let mut engine = Engine::default();
        for _ in 0..INPUT_QUEUE_CAPACITY {
            engine.push_event(InputEvent::KeyDown(1)).unwrap();
        }
        assert_eq!(
            engine.push_event(InputEvent::KeyUp(1)),
            Err(InputEvent::KeyUp(1))
        );
    }

    #[test]
    fn dpad_moves_root() {
        let mut engine = Engine::default();
        engine.handle_buttons(Buttons::UP, Buttons::NONE);
        engine.handle_buttons(Buttons::RIGHT, Buttons::NONE);
        assert_eq!(engine.piano().octave(), 5);
        assert_eq!(engine.piano().pitch(), 4);
        assert_eq!(engine.piano().root_name(), "C#/Db");
        engine.handle_buttons(Buttons::DOWN | Buttons::LEFT, Buttons::NONE);
        assert_eq!((engine.piano().octave(), engine.piano().pitch()), (4, 3));
    }

    #[test]
    fn x_plays_test_tone() {
        let mut engine = Engine::default();
        engine.handle_buttons(Buttons::X, Buttons::NONE);
        assert!(engine.voices()[0].playing);
        assert_eq!(engine.voices()[0].freq, PIANO_PITCHES[51]);
        engine.handle_buttons(Buttons::NONE, Buttons::X);
        assert!(!engine.voices()[0].playing);
    }

    #[test]
    fn konami_requests_export() {
        let mut engine = Engine::default();
        for b in KONAMI_SEQUENCE {
            assert!(!engine.take_export_request());
            engine.handle_buttons(b, Buttons::NONE);
        }
        assert!(engine.take_export_request());
        assert!(!engine.take_export_request());
    }

    #[test]
    fn piano_scan_presses_and_releases() {
        let mut engine = Engine::default();
        let chord = PianoKeys::from_key(0)
            .with(PianoKeys::from_key(4))
            .with(PianoKeys::from_key(12));
        engine.scan_piano(chord, PianoKeys(0));
        let playing: Vec<usize> = engine
            .voices()
            .iter()
            .filter(|v| v.playing)
            .map(|v| v.key)
            .collect();
        assert_eq!(playing, [0, 4, 12]);

        engine.scan_piano(PianoKeys::from_key(4), PianoKeys::from_key(4).with(PianoKeys::from_key(12)));
        assert!(engine.voices()[4].playing);
        assert!(engine.voices()[12].stopping);
    }

    #[test]
    fn render_is_muted_while_idle() {
        let mut engine = wavetable_engine();
        assert!(!engine.is_sounding());
        assert!((0..500).all(|_| engine.render_frame() == Frame::silence()));
    }

    #[test]
    fn capture_uses_active_synth() {
        let mut engine = wavetable_engine();
        assert!(engine.capture(440).is_ok());
        engine.select(SynthKind::Plucked);
        assert_eq!(
            engine.capture(440),
            Err(CaptureError::Unsupported("Plucked String"))
        );
    }
}
