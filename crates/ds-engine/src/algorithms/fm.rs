//! Four-operator FM synth.
//!
//! Every voice owns one sine oscillator per operator. The routing vector
//! forms the operator graph: an operator either modulates another
//! operator's frequency, is a carrier summed into the output, or is off.

use alloc::vec::Vec;

use ds_core::{
    FmParams, FmRouting, Sine, SynthParameters, VoiceState, FM_OPERATORS, TABLE_LENGTH,
    VOICE_COUNT,
};

use crate::algorithm::{AlgorithmInfo, ParamInfo, SynthAlgorithm};
use crate::export::ExportSession;

/// Modulator output is scaled down by this before it offsets a frequency.
const MODULATION_DIVISOR: i32 = 256;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "FM",
    short_name: "FM",
    exportable: false,
    params: &[
        ParamInfo {
            name: "amps",
            min: 0,
            max: TABLE_LENGTH as i32 - 1,
            default: 0,
        },
        ParamInfo {
            name: "routings",
            min: 0,
            max: FmRouting::OFF_SLOT,
            default: FmRouting::OFF_SLOT,
        },
        ParamInfo {
            name: "ratios",
            min: 0,
            max: 12,
            default: 1,
        },
    ],
};

type Operators = [Sine; FM_OPERATORS];

pub struct Fm {
    gain: i32,
    voices: Vec<Operators>,
}

impl Fm {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self {
            gain,
            voices: (0..VOICE_COUNT)
                .map(|_| core::array::from_fn(|_| Sine::new(sample_rate)))
                .collect(),
        }
    }
}

/// Output of operator `op`, including everything that modulates it.
///
/// Recursion stops after `FM_OPERATORS` levels, so a routing cycle yields
/// silence from the point it closes.
fn evaluate(ops: &mut Operators, fm: &FmParams, op: usize, freq: i32, depth: usize) -> i32 {
    if fm.routings[op] == FmRouting::Off || depth >= FM_OPERATORS {
        return 0;
    }
    let mut modulation = 0;
    for modulator in 0..FM_OPERATORS {
        if fm.routings[modulator] == FmRouting::Modulates(op as u8) {
            modulation += evaluate(ops, fm, modulator, freq, depth + 1) / MODULATION_DIVISOR;
        }
    }
    let sin = ops[op].sin(fm.ratios[op].wrapping_mul(freq).wrapping_add(modulation)) as i32;
    fm.amps[op] * sin / TABLE_LENGTH as i32
}

impl SynthAlgorithm for Fm {
    fn info(&self) -> &AlgorithmInfo {
        &INFO
    }

    fn sample(
        &mut self,
        voice: &mut VoiceState,
        params: &SynthParameters,
        _export: &mut ExportSession,
    ) -> i16 {
        let Some(ops) = self.voices.get_mut(voice.key) else {
            return 0;
        };
        if !voice.playing {
            voice.stopping = false;
            return 0;
        }
        if voice.just_pressed {
            ops.iter_mut().for_each(Sine::reset);
            voice.just_pressed = false;
        }

        let fm = &params.fm;
        let mut output = 0i32;
        for op in 0..FM_OPERATORS {
            if fm.routings[op] == FmRouting::Carrier {
                output = output.wrapping_add(evaluate(ops, fm, op, voice.freq, 0));
            }
        }
        self.gain.wrapping_mul(output) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fm: FmParams, frames: usize) -> Vec<i16> {
        let mut synth = Fm::new(1, 8192);
        let mut params = SynthParameters::default();
        params.fm = fm;
        let mut export = ExportSession::default();
        let mut voice = VoiceState::new(0);
        voice.trigger(256);
        (0..frames)
            .map(|_| synth.sample(&mut voice, &params, &mut export))
            .collect()
    }

    #[test]
    fn single_carrier_is_scaled_sine() {
        let out = render(FmParams::default(), 33);
        // 256 Hz at 8192 Hz: a quarter turn every 8 frames
        assert_eq!(out[0], 0);
        assert_eq!(out[8], (236 * 4096 / TABLE_LENGTH as i32) as i16);
        assert_eq!(out[24], -(236 * 4096 / TABLE_LENGTH as i32) as i16);
    }

    #[test]
    fn off_operators_contribute_nothing() {
        let plain = render(FmParams::default(), 200);

        let mut fm = FmParams::default();
        fm.amps = [236, 236, 236, 236];
        fm.ratios = [1, 3, 5, 7];
        fm.routings = [
            FmRouting::Carrier,
            FmRouting::Off,
            FmRouting::Off,
            FmRouting::Off,
        ];
        assert_eq!(render(fm, 200), plain);
    }

    #[test]
    fn modulator_changes_carrier() {
        let plain = render(FmParams::default(), 200);
        let mut fm = FmParams::default();
        fm.amps = [236, 236, 0, 0];
        fm.routings = [
            FmRouting::Carrier,
            FmRouting::Modulates(0),
            FmRouting::Off,
            FmRouting::Off,
        ];
        assert_ne!(render(fm, 200), plain);
    }

    #[test]
    fn routing_cycle_terminates() {
        let mut fm = FmParams::default();
        fm.amps = [236, 236, 236, 236];
        fm.routings = [
            FmRouting::Modulates(1),
            FmRouting::Modulates(0),
            FmRouting::Carrier,
            FmRouting::Modulates(3),
        ];
        let out = render(fm, 50);
        assert_eq!(out.len(), 50);
    }

    #[test]
    fn no_carrier_is_silent() {
        let mut fm = FmParams::default();
        fm.routings = [FmRouting::Off; FM_OPERATORS];
        assert!(render(fm, 64).iter().all(|&s| s == 0));
    }
}
