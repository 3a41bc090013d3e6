//! Bubble sort: a wavetable that sorts itself while it plays.
//!
//! Each step compares the slot just played with the one about to be played
//! and, with a probability set by the slider, swaps them into ascending
//! order. Any table converges to a single ramp.

use alloc::vec::Vec;

use ds_core::{
    BurstFill, SynthParameters, Table, VoiceState, Xorshift32, TABLE_LENGTH, TABLE_MAX, VOICE_COUNT,
};

use super::phase::wave_phase;
use crate::algorithm::{AlgorithmInfo, SynthAlgorithm};
use crate::export::ExportSession;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Bubble Sort",
    short_name: "Bub",
    exportable: false,
    params: &[],
};

struct BubbleVoice {
    previous_phase: usize,
    table: Table,
}

pub struct BubbleSort {
    gain: i32,
    sample_rate: u32,
    rng: Xorshift32,
    voices: Vec<BubbleVoice>,
}

impl BubbleSort {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            gain,
            sample_rate,
            rng: Xorshift32::new(),
            voices: (0..VOICE_COUNT)
                .map(|_| BubbleVoice {
                    previous_phase: 0,
                    table: [0; TABLE_LENGTH],
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn table(&self, key: usize) -> &[i16] {
        &self.voices[key].table
    }
}

impl SynthAlgorithm for BubbleSort {
    fn info(&self) -> &AlgorithmInfo {
        &INFO
    }

    fn sample(
        &mut self,
        voice: &mut VoiceState,
        params: &SynthParameters,
        _export: &mut ExportSession,
    ) -> i16 {
        let Some(state) = self.voices.get_mut(voice.key) else {
            return 0;
        };
        if !voice.playing || voice.freq <= 0 {
            voice.stopping = false;
            return 0;
        }
        let novelty = &params.novelty;

        if voice.just_pressed {
            match novelty.fill {
                BurstFill::Random => self.rng.fill(&mut state.table, TABLE_MAX as u32),
                BurstFill::Table => state.table = novelty.table,
            }
            state.previous_phase = 0;
            voice.just_pressed = false;
        }

        let phase = wave_phase(voice, self.sample_rate).index;
        let previous = state.table[state.previous_phase];
        let current = state.table[phase];
        if state.previous_phase < phase
            && previous > current
            && self
                .rng
                .prob(novelty.slider.max(0) as u32, TABLE_LENGTH as u32 - 1)
        {
            state.table.swap(state.previous_phase, phase);
        }
        state.previous_phase = phase;
        voice.phase_frames_elapsed += 1;

        self.gain.wrapping_mul(current as i32) as i16
    }
}
