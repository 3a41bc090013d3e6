//! Karplus-Strong style plucked string.
//!
//! Each voice seeds a one-period delay line on attack, then replaces every
//! slot with the average of itself and its predecessor on each pass. The
//! blend factor sets how often the averaged value keeps its sign; low values
//! flip it most of the time, which turns the string into a drum.

use alloc::vec::Vec;

use ds_core::{SynthParameters, VoiceState, Xorshift32, TABLE_LENGTH, VOICE_COUNT};

use super::burst::{burst_length, Burst};
use crate::algorithm::{AlgorithmInfo, ParamInfo, SynthAlgorithm};
use crate::export::ExportSession;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Plucked String",
    short_name: "Plk",
    exportable: false,
    params: &[
        ParamInfo {
            name: "blend_factor",
            min: 0,
            max: TABLE_LENGTH as i32 - 1,
            default: 0,
        },
        ParamInfo {
            name: "burst_fill",
            min: 0,
            max: 1,
            default: 0,
        },
    ],
};

pub struct PluckedString {
    gain: i32,
    sample_rate: u32,
    rng: Xorshift32,
    voices: Vec<Burst>,
}

impl PluckedString {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            gain,
            sample_rate,
            rng: Xorshift32::new(),
            voices: (0..VOICE_COUNT).map(|_| Burst::new()).collect(),
        }
    }
}

impl SynthAlgorithm for PluckedString {
    fn info(&self) -> &AlgorithmInfo {
        &INFO
    }

    fn sample(
        &mut self,
        voice: &mut VoiceState,
        params: &SynthParameters,
        _export: &mut ExportSession,
    ) -> i16 {
        let Some(burst) = self.voices.get_mut(voice.key) else {
            return 0;
        };
        if !voice.playing || voice.freq <= 0 {
            voice.stopping = false;
            return 0;
        }
        let plucked = &params.plucked;

        // A voice can arrive mid-note after a synth switch with nothing seeded
        if voice.just_pressed || burst.table.is_empty() {
            let length = burst_length(self.sample_rate, voice.freq);
            burst.seed(length, plucked.burst_fill, &plucked.burst_table, &mut self.rng);
            burst.previous = burst.table[0];
            voice.just_pressed = false;
        }

        let phase = burst.phase % burst.len();
        burst.phase = phase + 1;
        let current = burst.table[phase];
        let sign = if self
            .rng
            .prob(plucked.blend_factor.max(0) as u32, TABLE_LENGTH as u32 - 1)
        {
            1
        } else {
            -1
        };
        burst.table[phase] = sign * ((current + burst.previous) >> 1);
        burst.previous = current;

        self.gain.wrapping_mul(burst.table[phase]) as i16
    }
}
