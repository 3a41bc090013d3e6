//! Excited string: a delay line that is either nudged by noise or smoothed.

use alloc::vec::Vec;

use ds_core::{SynthParameters, VoiceState, Xorshift32, TABLE_LENGTH, VOICE_COUNT};

use super::burst::{burst_length, Burst};
use crate::algorithm::{AlgorithmInfo, SynthAlgorithm};
use crate::export::ExportSession;

/// Size of one random excitation step.
const EXCITATION: i32 = 16;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Excited String",
    short_name: "Exc",
    exportable: false,
    params: &[],
};

pub struct ExcitedString {
    gain: i32,
    sample_rate: u32,
    rng: Xorshift32,
    voices: Vec<Burst>,
}

impl ExcitedString {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            gain,
            sample_rate,
            rng: Xorshift32::new(),
            voices: (0..VOICE_COUNT).map(|_| Burst::new()).collect(),
        }
    }
}

impl SynthAlgorithm for ExcitedString {
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
        let novelty = &params.novelty;

        if voice.just_pressed || burst.table.is_empty() {
            let length = burst_length(self.sample_rate, voice.freq);
            burst.seed(length, novelty.fill, &novelty.table, &mut self.rng);
            burst.previous = burst.table[burst.len() - 1];
            voice.just_pressed = false;
        }

        let phase = voice.phase_frames_elapsed.max(0) as usize % burst.len();
        let output = if self
            .rng
            .prob(novelty.slider.max(0) as u32, TABLE_LENGTH as u32 - 1)
        {
            let step = if self.rng.coin_flip() {
                EXCITATION
            } else {
                -EXCITATION
            };
            burst.table[phase] += step;
            burst.table[phase]
        } else {
            let smoothed = (burst.table[phase] + burst.previous) >> 1;
            burst.table[phase] = smoothed;
            burst.previous = smoothed;
            smoothed
        };
        voice.phase_frames_elapsed = ((phase + 1) % burst.len()) as i32;

        self.gain.wrapping_mul(output) as i16
    }
}
