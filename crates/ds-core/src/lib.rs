//! Core types for the drawsynth engine.
//!
//! Holds the integer primitives (lerp, xorshift, sine table), per-voice
//! state, the shared parameter set edited by the UI, and the pitch and
//! input-decoding tables. Everything here is plain data plus pure
//! arithmetic; the synthesis algorithms live in `ds-engine`.
//!
//! Designed to be `no_std` compatible.

#![cfg_attr(not(feature = "std"), no_std)]

mod geometry;
mod input;
mod lerp;
mod params;
mod pitch;
mod random;
mod ring;
mod sine;
mod voice;

pub use geometry::{
    DEPOP_FRAMES, MAX_BURST_LENGTH, SCREEN_HEIGHT, SCREEN_PADDING, SCREEN_WIDTH, TABLE_LENGTH,
    TABLE_MAX, VOICE_COUNT,
};
pub use input::{decode_piano_mask, Buttons, KonamiDetector, PianoKeys, KONAMI_SEQUENCE};
pub use lerp::lerp;
pub use params::{
    BurstFill, FmParams, FmRouting, NoveltyAlgorithm, NoveltyParams, PluckedParams,
    SynthParameters, Table, TransitionAlgorithm, TransitionCycle, WavetableParams, FM_OPERATORS,
    FM_UI_SLOTS, MAX_TRANSITION_TIME,
};
pub use pitch::{midi_entry, MidiEntry, MIDI_TABLE, NOTE_NAMES, PIANO_PITCHES};
pub use random::{Xorshift32, XORSHIFT_SEED};
pub use ring::Ring;
pub use sine::{sin_lerp, Sine};
pub use voice::VoiceState;
