//! Novelty synth: one editor page driving three experimental algorithms.

use ds_core::{NoveltyAlgorithm, SynthParameters, VoiceState, TABLE_LENGTH};

use super::{BubbleSort, ExcitedString, Xor};
use crate::algorithm::{AlgorithmInfo, ParamInfo, SynthAlgorithm};
use crate::export::ExportSession;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Novelty",
    short_name: "Nov",
    exportable: false,
    params: &[
        ParamInfo {
            name: "algorithm",
            min: 0,
            max: 2,
            default: 0,
        },
        ParamInfo {
            name: "slider",
            min: 0,
            max: TABLE_LENGTH as i32 - 1,
            default: 0,
        },
        ParamInfo {
            name: "fill",
            min: 0,
            max: 1,
            default: 0,
        },
    ],
};

/// Forwards each sample to the algorithm selected by
/// `params.novelty.algorithm`. The others keep their voice state untouched
/// until selected again.
pub struct Novelty {
    bubble_sort: BubbleSort,
    xor: Xor,
    excited_string: ExcitedString,
}

impl Novelty {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            bubble_sort: BubbleSort::new(gain, sample_rate),
            xor: Xor::new(gain, sample_rate),
            excited_string: ExcitedString::new(gain, sample_rate),
        }
    }

    fn selected(&mut self, algorithm: NoveltyAlgorithm) -> &mut dyn SynthAlgorithm {
        match algorithm {
            NoveltyAlgorithm::BubbleSort => &mut self.bubble_sort,
            NoveltyAlgorithm::Xor => &mut self.xor,
            NoveltyAlgorithm::ExcitedString => &mut self.excited_string,
        }
    }
}

impl SynthAlgorithm for Novelty {
    fn info(&self) -> &AlgorithmInfo {
        &INFO
    }

    fn sample(
        &mut self,
        voice: &mut VoiceState,
        params: &SynthParameters,
        export: &mut ExportSession,
    ) -> i16 {
        self.selected(params.novelty.algorithm)
            .sample(voice, params, export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::BurstFill;

    fn render(algo: &mut dyn SynthAlgorithm, params: &SynthParameters, frames: usize) -> Vec<i16> {
        let mut export = ExportSession::default();
        let mut voice = VoiceState::new(0);
        voice.trigger(440);
        (0..frames)
            .map(|_| algo.sample(&mut voice, params, &mut export))
            .collect()
    }

    #[test]
    fn dispatches_to_selected_algorithm() {
        let mut params = SynthParameters::default();
        params.novelty.fill = BurstFill::Table;
        for (i, v) in params.novelty.table.iter_mut().enumerate() {
            *v = (i % 100) as i16;
        }
        params.novelty.slider = 120;

        for algorithm in NoveltyAlgorithm::ALL.iter().copied() {
            params.novelty.algorithm = algorithm;
            let mut novelty = Novelty::new(27, 20_000);
            let expected = match algorithm {
                NoveltyAlgorithm::BubbleSort => {
                    render(&mut BubbleSort::new(27, 20_000), &params, 300)
                }
                NoveltyAlgorithm::Xor => render(&mut Xor::new(27, 20_000), &params, 300),
                NoveltyAlgorithm::ExcitedString => {
                    render(&mut ExcitedString::new(27, 20_000), &params, 300)
                }
            };
            assert_eq!(render(&mut novelty, &params, 300), expected, "{algorithm:?}");
        }
    }

    #[test]
    fn unselected_algorithms_keep_their_state() {
        let mut params = SynthParameters::default();
        params.novelty.fill = BurstFill::Table;
        params.novelty.slider = TABLE_LENGTH as i32 - 1;
        for (i, v) in params.novelty.table.iter_mut().enumerate() {
            *v = ((TABLE_LENGTH - i) % 170) as i16;
        }
        let mut novelty = Novelty::new(1, TABLE_LENGTH as u32);
        let mut export = ExportSession::default();
        let mut voice = VoiceState::new(0);
        voice.trigger(1);

        for _ in 0..500 {
            novelty.sample(&mut voice, &params, &mut export);
        }
        let sorted_so_far = novelty.bubble_sort.table(0).to_vec();
        assert_ne!(sorted_so_far.as_slice(), &params.novelty.table[..]);

        params.novelty.algorithm = NoveltyAlgorithm::Xor;
        for _ in 0..500 {
            novelty.sample(&mut voice, &params, &mut export);
        }
        assert_eq!(novelty.bubble_sort.table(0), sorted_so_far.as_slice());
    }
}
