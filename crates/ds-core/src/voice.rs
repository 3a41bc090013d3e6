//! Per-key voice state.

use crate::geometry::DEPOP_FRAMES;

/// Mutable state of one polyphonic voice slot.
///
/// A voice is in exactly one of three phases: silent (neither `playing` nor
/// `stopping`), sounding (`playing`, possibly still inside its attack ramp)
/// or releasing (`stopping`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoiceState {
    /// Slot index, 0-12.
    pub key: usize,
    /// Key held; the algorithm is producing steady-state output.
    pub playing: bool,
    /// Release ramp in progress.
    pub stopping: bool,
    /// Set by a trigger; the algorithm clears it after initializing.
    pub just_pressed: bool,
    /// Target frequency in Hz.
    pub freq: i32,
    /// Frames driving the waveform phase (periodically reset).
    pub phase_frames_elapsed: i32,
    /// Frames driving the transition table position.
    pub transition_frames_elapsed: i32,
    /// Position inside the attack or release ramp, `0..=DEPOP_FRAMES`.
    pub depop_frames_elapsed: i32,
    /// Last steady-state sample, gain applied. Release ramps start here.
    pub last_sample_outputted: i32,
    /// Ping-pong traversal direction (true = forward).
    pub ping_pong_direction: bool,
}

impl VoiceState {
    /// A silent voice for slot `key`.
    pub fn new(key: usize) -> Self {
        Self {
            key,
            ping_pong_direction: true,
            ..Default::default()
        }
    }

    /// Start a note at `freq` Hz.
    pub fn trigger(&mut self, freq: i32) {
        self.playing = true;
        self.stopping = false;
        self.just_pressed = true;
        self.freq = freq;
        self.phase_frames_elapsed = 0;
        self.transition_frames_elapsed = 0;
        self.depop_frames_elapsed = 0;
        self.ping_pong_direction = true;
    }

    /// Release the note; the ramp state is kept for the release tail.
    pub fn release(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.stopping = true;
    }

    /// Neither sounding nor releasing.
    pub fn is_silent(&self) -> bool {
        !self.playing && !self.stopping
    }

    /// Still inside the attack ramp.
    pub fn in_attack(&self) -> bool {
        self.playing && self.depop_frames_elapsed < DEPOP_FRAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_voice_is_silent() {
        let v = VoiceState::new(4);
        assert_eq!(v.key, 4);
        assert!(v.is_silent());
        assert!(!v.just_pressed);
    }

    #[test]
    fn trigger_resets_counters() {
        let mut v = VoiceState::new(0);
        v.phase_frames_elapsed = 99;
        v.transition_frames_elapsed = 12;
        v.depop_frames_elapsed = 30;
        v.stopping = true;
        v.trigger(440);
        assert!(v.playing);
        assert!(!v.stopping);
        assert!(v.just_pressed);
        assert_eq!(v.freq, 440);
        assert_eq!(v.phase_frames_elapsed, 0);
        assert_eq!(v.transition_frames_elapsed, 0);
        assert_eq!(v.depop_frames_elapsed, 0);
        assert!(v.in_attack());
    }

    #[test]
    fn release_keeps_ramp_state() {
        let mut v = VoiceState::new(0);
        v.trigger(220);
        v.depop_frames_elapsed = DEPOP_FRAMES;
        v.last_sample_outputted = 1234;
        v.release();
        assert!(!v.playing);
        assert!(v.stopping);
        assert_eq!(v.depop_frames_elapsed, DEPOP_FRAMES);
        assert_eq!(v.last_sample_outputted, 1234);
    }

    #[test]
    fn release_of_silent_voice_is_noop() {
        let mut v = VoiceState::new(0);
        v.release();
        assert!(v.is_silent());
    }
}
