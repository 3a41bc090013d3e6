//! Square-wave test tone.

use ds_core::{SynthParameters, VoiceState};

use crate::algorithm::{AlgorithmInfo, SynthAlgorithm};
use crate::export::ExportSession;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Square",
    short_name: "Sqr",
    exportable: false,
    params: &[],
};

/// Fixed-amplitude square wave; ignores the parameter set.
pub struct Square {
    gain: i32,
    sample_rate: i32,
}

impl Square {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            gain,
            sample_rate: sample_rate.max(1) as i32,
        }
    }
}

impl SynthAlgorithm for Square {
    fn info(&self) -> &AlgorithmInfo {
        &INFO
    }

    fn sample(
        &mut self,
        voice: &mut VoiceState,
        _params: &SynthParameters,
        _export: &mut ExportSession,
    ) -> i16 {
        if !voice.playing || voice.freq <= 0 {
            voice.stopping = false;
            return 0;
        }
        voice.just_pressed = false;

        let period = (self.sample_rate / voice.freq).max(1);
        let half = self.sample_rate / (2 * voice.freq);
        let position = voice.phase_frames_elapsed % period;
        voice.phase_frames_elapsed = voice.phase_frames_elapsed.wrapping_add(1) % period;

        let out = if position > half { self.gain } else { self.gain.wrapping_neg() };
        out as i16
    }
}
