//! Synth algorithm trait.

use ds_core::{SynthParameters, VoiceState};

use crate::export::ExportSession;

/// Metadata describing one editable control of a synth.
pub struct ParamInfo {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

/// Static metadata about a synth algorithm.
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    /// Supports loop-point capture for SFZ export.
    pub exportable: bool,
    pub params: &'static [ParamInfo],
}

/// Per-voice sample generator.
///
/// Implementations own whatever per-voice working state they need, indexed
/// by `VoiceState::key`. One call produces one sample for one voice and
/// advances that voice's counters.
pub trait SynthAlgorithm: Send {
    fn info(&self) -> &AlgorithmInfo;

    /// Produce the next sample for `voice`, gain applied.
    ///
    /// Consumes `voice.just_pressed`. Only exportable algorithms touch
    /// `export`.
    fn sample(
        &mut self,
        voice: &mut VoiceState,
        params: &SynthParameters,
        export: &mut ExportSession,
    ) -> i16;
}
