//! Audio output backends for drawsynth.

mod cpal_backend;
mod resample;
mod traits;

pub use cpal_backend::CpalOutput;
pub use resample::HoldResampler;
pub use traits::{AudioError, AudioOutput};
