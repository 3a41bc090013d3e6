//! Synth bank entry: one algorithm plus its output settings and export state.

use alloc::boxed::Box;

use ds_core::{SynthParameters, VoiceState};

use crate::algorithm::{AlgorithmInfo, SynthAlgorithm};
use crate::algorithms::{create_algorithm, SynthKind};
use crate::export::{self, Capture, CaptureError, ExportSession};

/// Output gain and sample rate of one synth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthSettings {
    pub gain: i32,
    pub sample_rate: u32,
}

/// A synth of the bank.
pub struct Synth {
    kind: SynthKind,
    settings: SynthSettings,
    algorithm: Box<dyn SynthAlgorithm>,
    export: ExportSession,
}

impl Synth {
    pub fn new(kind: SynthKind, settings: SynthSettings) -> Self {
        Self {
            kind,
            settings,
            algorithm: create_algorithm(kind, settings),
            export: ExportSession::default(),
        }
    }

    pub fn kind(&self) -> SynthKind {
        self.kind
    }

    pub fn info(&self) -> &AlgorithmInfo {
        self.algorithm.info()
    }

    pub fn settings(&self) -> SynthSettings {
        self.settings
    }

    /// Rate at which the host must consume this synth's frames.
    pub fn sample_rate(&self) -> u32 {
        self.settings.sample_rate
    }

    pub fn is_exporting(&self) -> bool {
        self.export.exporting
    }

    /// Sum one sample of every voice.
    ///
    /// The sum wraps like the 16-bit output it feeds. Silent while a
    /// capture is in progress.
    pub fn frame_output(&mut self, voices: &mut [VoiceState], params: &SynthParameters) -> i16 {
        if self.export.exporting {
            return 0;
        }
        voices.iter_mut().fold(0i16, |acc, voice| {
            acc.wrapping_add(self.algorithm.sample(voice, params, &mut self.export))
        })
    }

    /// Capture one loopable note at `freq` Hz. See [`Capture`].
    pub fn capture(&mut self, params: &SynthParameters, freq: i32) -> Result<Capture, CaptureError> {
        export::capture(self.algorithm.as_mut(), &mut self.export, params, freq)
    }
}
