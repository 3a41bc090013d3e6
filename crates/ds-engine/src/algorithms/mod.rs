//! Built-in synth algorithms.

mod bubble_sort;
mod burst;
mod excited_string;
mod fm;
mod novelty;
mod phase;
mod plucked_string;
mod square;
mod wavetable;
mod xor;

use alloc::boxed::Box;

use crate::algorithm::SynthAlgorithm;
use crate::synth::SynthSettings;

pub use bubble_sort::BubbleSort;
pub use excited_string::ExcitedString;
pub use fm::Fm;
pub use novelty::Novelty;
pub use plucked_string::PluckedString;
pub use square::Square;
pub use wavetable::Wavetable;
pub use xor::Xor;

/// Number of synths in the bank.
pub const SYNTH_COUNT: usize = 5;

/// The synths of the bank, in selection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SynthKind {
    Square,
    Wavetable,
    Plucked,
    Novelty,
    Fm,
}

impl SynthKind {
    /// Bank order; SELECT walks forward through it.
    pub const ALL: [SynthKind; SYNTH_COUNT] = [
        SynthKind::Square,
        SynthKind::Wavetable,
        SynthKind::Plucked,
        SynthKind::Novelty,
        SynthKind::Fm,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable lowercase name used in patches and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SynthKind::Square => "square",
            SynthKind::Wavetable => "wavetable",
            SynthKind::Plucked => "plucked",
            SynthKind::Novelty => "novelty",
            SynthKind::Fm => "fm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Gain and sample rate the synth ships with.
    pub fn default_settings(self) -> SynthSettings {
        let (gain, sample_rate) = match self {
            SynthKind::Square => (1500, 20_000),
            SynthKind::Wavetable => (31, 10_000),
            SynthKind::Plucked => (27, 20_000),
            SynthKind::Novelty => (27, 20_000),
            SynthKind::Fm => (1, 8192),
        };
        SynthSettings { gain, sample_rate }
    }
}

/// Create the algorithm behind `kind`.
pub fn create_algorithm(kind: SynthKind, settings: SynthSettings) -> Box<dyn SynthAlgorithm> {
    let SynthSettings { gain, sample_rate } = settings;
    match kind {
        SynthKind::Square => Box::new(Square::new(gain, sample_rate)),
        SynthKind::Wavetable => Box::new(Wavetable::new(gain, sample_rate)),
        SynthKind::Plucked => Box::new(PluckedString::new(gain, sample_rate)),
        SynthKind::Novelty => Box::new(Novelty::new(gain, sample_rate)),
        SynthKind::Fm => Box::new(Fm::new(gain, sample_rate)),
    }
}
