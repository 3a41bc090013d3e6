//! Key-to-voice mapping with a movable root note.

use ds_core::{VoiceState, NOTE_NAMES, PIANO_PITCHES};

const DEFAULT_PITCH: i32 = 3;
const DEFAULT_OCTAVE: i32 = 4;

/// Maps the 13 keys onto the pitch table starting at the root note.
///
/// The root is `pitch + 12 * octave` semitones above the table's lowest A.
/// Neither component is bounded on its own; keys that land outside the
/// table simply do not sound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piano {
    pitch: i32,
    octave: i32,
}

impl Default for Piano {
    fn default() -> Self {
        Self {
            pitch: DEFAULT_PITCH,
            octave: DEFAULT_OCTAVE,
        }
    }
}

impl Piano {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn inc_pitch(&mut self) {
        self.pitch += 1;
    }

    pub fn dec_pitch(&mut self) {
        self.pitch -= 1;
    }

    pub fn inc_octave(&mut self) {
        self.octave += 1;
    }

    pub fn dec_octave(&mut self) {
        self.octave -= 1;
    }

    /// Name of the root note, e.g. `"C#/Db"`.
    pub fn root_name(&self) -> &'static str {
        NOTE_NAMES[self.pitch.rem_euclid(12) as usize]
    }

    /// Frequency for `key`, or `None` outside the pitch table.
    pub fn frequency(&self, key: usize) -> Option<i32> {
        let index = self.pitch + 12 * self.octave + key as i32;
        usize::try_from(index)
            .ok()
            .and_then(|i| PIANO_PITCHES.get(i))
            .copied()
    }

    /// Start `voice` at its key's frequency. Returns false if out of range.
    pub fn play_key(&self, voice: &mut VoiceState) -> bool {
        match self.frequency(voice.key) {
            Some(freq) => {
                voice.trigger(freq);
                true
            }
            None => false,
        }
    }

    pub fn stop_key(&self, voice: &mut VoiceState) {
        voice.release();
    }
}
