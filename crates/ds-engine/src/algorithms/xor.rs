//! XOR feedback wavetable.

use alloc::vec::Vec;

use ds_core::{
    BurstFill, SynthParameters, Table, VoiceState, Xorshift32, TABLE_LENGTH, TABLE_MAX, VOICE_COUNT,
};

use super::phase::wave_phase;
use crate::algorithm::{AlgorithmInfo, SynthAlgorithm};
use crate::export::ExportSession;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "XOR",
    short_name: "Xor",
    exportable: false,
    params: &[],
};

struct XorVoice {
    previous: i16,
    table: Table,
}

/// Wavetable whose slots are randomly XORed with the previously played
/// value and written back, so the wave mutates as it loops.
pub struct Xor {
    gain: i32,
    sample_rate: u32,
    rng: Xorshift32,
    voices: Vec<XorVoice>,
}

impl Xor {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            gain,
            sample_rate,
            rng: Xorshift32::new(),
            voices: (0..VOICE_COUNT)
                .map(|_| XorVoice {
                    previous: 0,
                    table: [0; TABLE_LENGTH],
                })
                .collect(),
        }
    }
}

impl SynthAlgorithm for Xor {
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
            state.previous = state.table[TABLE_MAX - 1];
            voice.just_pressed = false;
        }

        let phase = wave_phase(voice, self.sample_rate).index;
        let mut current = state.table[phase];
        voice.phase_frames_elapsed += 1;

        if self
            .rng
            .prob(novelty.slider.max(0) as u32, TABLE_LENGTH as u32)
        {
            current ^= state.previous;
            state.table[phase] = current;
        }
        state.previous = current;

        self.gain.wrapping_mul(current as i32) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_slider_plays_table_unchanged() {
        let mut synth = Xor::new(2, TABLE_LENGTH as u32);
        let mut params = SynthParameters::default();
        params.novelty.fill = BurstFill::Table;
        for (i, v) in params.novelty.table.iter_mut().enumerate() {
            *v = (i % TABLE_MAX) as i16;
        }
        let mut export = ExportSession::default();
        let mut voice = VoiceState::new(0);
        voice.trigger(1);
        for i in 0..TABLE_LENGTH {
            let out = synth.sample(&mut voice, &params, &mut export);
            assert_eq!(out, 2 * (i % TABLE_MAX) as i16);
        }
    }

    #[test]
    fn full_slider_xors_with_previous() {
        let mut synth = Xor::new(1, TABLE_LENGTH as u32);
        let mut params = SynthParameters::default();
        params.novelty.fill = BurstFill::Table;
        params.novelty.slider = TABLE_LENGTH as i32;
        params.novelty.table[0] = 0b1010;
        params.novelty.table[1] = 0b0110;
        params.novelty.table[TABLE_MAX - 1] = 0b0001;
        let mut export = ExportSession::default();
        let mut voice = VoiceState::new(0);
        voice.trigger(1);
        assert_eq!(synth.sample(&mut voice, &params, &mut export), 0b1011);
        assert_eq!(synth.sample(&mut voice, &params, &mut export), 0b1101);
        assert_eq!(synth.voices[0].table[0], 0b1011);
    }
}
