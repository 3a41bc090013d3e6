//! File formats for drawsynth exports.
//!
//! Mono 16-bit RIFF/WAVE for captured notes and the SFZ instrument text
//! that maps them onto MIDI keys with loop points.

mod sfz_format;
mod wav_format;

pub use sfz_format::{sfz_to_string, write_sfz, SfzRegion, SFZ_GLOBAL_HEADER};
pub use wav_format::{load_wav, samples_to_wav, write_wav, Wav};

use thiserror::Error;

/// Error type for reading and writing export files.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Invalid file header or magic bytes
    #[error("invalid WAV header")]
    InvalidHeader,
    /// Unexpected end of file
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Anything other than uncompressed mono 16-bit PCM
    #[error("unsupported WAV layout: format {format}, {channels} channel(s), {bits} bits")]
    Unsupported { format: u16, channels: u16, bits: u16 },
    /// Sample data does not fit a RIFF size field
    #[error("{0} samples do not fit in a WAV file")]
    TooLarge(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
