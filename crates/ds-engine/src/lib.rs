//! Synthesis engine for drawsynth.
//!
//! Runs the per-voice synthesis algorithms, sums the voices of the active
//! synth into one mono frame per tick, captures loopable single-note
//! samples for SFZ export, and applies queued input once per display frame.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod algorithm;
pub mod algorithms;
mod engine;
mod export;
mod frame;
mod piano;
mod synth;

pub use algorithm::{AlgorithmInfo, ParamInfo, SynthAlgorithm};
pub use algorithms::{create_algorithm, SynthKind, SYNTH_COUNT};
pub use engine::{Engine, InputEvent, DISPLAY_RATE, INPUT_QUEUE_CAPACITY};
pub use export::{Capture, CaptureError, ExportSession, MAX_CAPTURE_FRAMES};
pub use frame::Frame;
pub use piano::Piano;
pub use synth::{Synth, SynthSettings};
