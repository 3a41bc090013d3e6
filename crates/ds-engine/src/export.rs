//! Offline single-note capture for SFZ export.
//!
//! A capture drives one throwaway voice through an exportable algorithm
//! until the algorithm reports loop points and clears
//! [`ExportSession::exporting`]. It runs twice: a dry pass that only counts
//! samples, then a recording pass from fresh state. Both passes must agree.

use alloc::vec::Vec;

use ds_core::{SynthParameters, VoiceState};
use thiserror::Error;

use crate::algorithm::SynthAlgorithm;

/// Upper bound on the samples in one capture.
pub const MAX_CAPTURE_FRAMES: usize = 1 << 22;

/// Export bookkeeping owned by each synth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSession {
    /// Keep pulling samples while set; the algorithm clears it.
    pub exporting: bool,
    /// Samples produced since the capture started.
    pub frames_elapsed: i32,
    pub loop_start: Option<i32>,
    pub loop_end: Option<i32>,
}

impl ExportSession {
    /// Rewind the counters at the start of a capture.
    pub fn restart(&mut self) {
        self.frames_elapsed = 0;
        self.loop_start = None;
        self.loop_end = None;
    }

    /// Record the loop points and end the capture.
    pub fn finish(&mut self, loop_start: i32, loop_end: i32) {
        self.loop_start = Some(loop_start);
        self.loop_end = Some(loop_end);
        self.exporting = false;
    }
}

/// One captured note with its loop region, in sample offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub freq: i32,
    pub samples: Vec<i16>,
    pub loop_start: u32,
    pub loop_end: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("synth {0} does not support sfz export")]
    Unsupported(&'static str),
    #[error("capture frequency must be positive, got {0}")]
    ZeroFrequency(i32),
    #[error("no loop found at {freq} Hz within {frames} frames")]
    LoopNotFound { freq: i32, frames: usize },
    #[error("capture passes disagree at {freq} Hz: counted {counted} samples, recorded {recorded}")]
    PassMismatch {
        freq: i32,
        counted: usize,
        recorded: usize,
    },
}

/// Run `algorithm` on a fresh voice at `freq` until it ends the export,
/// feeding each sample to `sink`. Returns the number of samples produced.
fn run_pass(
    algorithm: &mut dyn SynthAlgorithm,
    session: &mut ExportSession,
    params: &SynthParameters,
    freq: i32,
    mut sink: impl FnMut(i16),
) -> Result<usize, CaptureError> {
    let mut voice = VoiceState::new(0);
    voice.trigger(freq);
    session.restart();
    session.exporting = true;

    let mut frames = 0;
    while session.exporting {
        if frames == MAX_CAPTURE_FRAMES {
            session.exporting = false;
            return Err(CaptureError::LoopNotFound {
                freq,
                frames: MAX_CAPTURE_FRAMES,
            });
        }
        sink(algorithm.sample(&mut voice, params, session));
        frames += 1;
    }
    Ok(frames)
}

/// Capture one loopable note at `freq` Hz.
pub(crate) fn capture(
    algorithm: &mut dyn SynthAlgorithm,
    session: &mut ExportSession,
    params: &SynthParameters,
    freq: i32,
) -> Result<Capture, CaptureError> {
    let info = algorithm.info();
    if !info.exportable {
        return Err(CaptureError::Unsupported(info.name));
    }
    if freq <= 0 {
        return Err(CaptureError::ZeroFrequency(freq));
    }

    let counted = run_pass(algorithm, session, params, freq, |_| {})?;

    let mut samples = Vec::with_capacity(counted);
    let recorded = run_pass(algorithm, session, params, freq, |s| samples.push(s))?;
    if recorded != counted {
        return Err(CaptureError::PassMismatch {
            freq,
            counted,
            recorded,
        });
    }

    let not_found = CaptureError::LoopNotFound {
        freq,
        frames: recorded,
    };
    let (Some(start), Some(end)) = (session.loop_start, session.loop_end) else {
        return Err(not_found);
    };
    match (u32::try_from(start), u32::try_from(end)) {
        (Ok(loop_start), Ok(loop_end)) if loop_start <= loop_end => Ok(Capture {
            freq,
            samples,
            loop_start,
            loop_end,
        }),
        _ => Err(not_found),
    }
}
