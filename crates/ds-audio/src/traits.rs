//! Audio output trait and error types.

use ds_engine::Frame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("unusable device configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("failed to pause stream: {0}")]
    Pause(#[from] cpal::PauseStreamError),
}

/// A mono frame sink running at a fixed rate.
pub trait AudioOutput {
    /// Frames consumed per second.
    fn sample_rate(&self) -> u32;

    /// Queue one frame, waiting until there is room.
    fn write_frame(&mut self, frame: Frame);

    fn start(&mut self) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;
}
