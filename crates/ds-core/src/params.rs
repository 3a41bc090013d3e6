//! Shared synthesis parameters edited by the UI.
//!
//! One `SynthParameters` value is owned by the engine root and handed by
//! reference to every algorithm call. Editors write into it directly; the
//! core only relies on the clamping built into `lerp` and modulo indexing.

use crate::geometry::{TABLE_LENGTH, TABLE_MAX};

/// A drawable table: one amplitude per column, values in `0..TABLE_MAX`.
pub type Table = [i16; TABLE_LENGTH];

/// Number of FM operators per voice.
pub const FM_OPERATORS: usize = 4;

/// Slots in the FM multi-slider/multi-switch editors.
pub const FM_UI_SLOTS: usize = 8;

/// Longest transition the editor slider can set: ten seconds at 10 kHz.
pub const MAX_TRANSITION_TIME: i32 = 100_000;

/// How two waveforms are combined by the transition value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionAlgorithm {
    /// Amplitude crossfade between the two tables.
    #[default]
    Morph,
    /// Hard split: table one right of the split point, table two left of it.
    Swipe,
    /// Crossfade from the swipe result toward the morph result.
    Combo,
}

/// What the transition counter does when it reaches the transition time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionCycle {
    /// Keep counting; the lerp clamp holds the last table position.
    #[default]
    Forward,
    /// Wrap back to the start.
    Loop,
    /// Reverse direction at each end.
    PingPong,
}

/// How a burst buffer is seeded on attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BurstFill {
    /// Uniform noise in `0..TABLE_MAX`.
    #[default]
    Random,
    /// The user-drawn table, resampled to the buffer length.
    Table,
}

/// Algorithm selected inside the novelty synth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoveltyAlgorithm {
    #[default]
    BubbleSort,
    Xor,
    ExcitedString,
}

/// Where an FM operator's output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FmRouting {
    /// Frequency-modulates the operator with this index.
    Modulates(u8),
    /// Summed into the voice output.
    Carrier,
    /// Silent.
    Off,
}

macro_rules! indexed_enum {
    ($ty:ty, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            /// Every variant in switch order.
            pub const ALL: &'static [$ty] = &[$(Self::$variant),+];

            /// Position of this option on its switch.
            pub fn index(self) -> usize {
                Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
            }

            /// Option at switch position `index`, if any.
            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            /// Lowercase name used in patch files.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            /// Parse a patch-file name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

indexed_enum!(TransitionAlgorithm, [Morph => "morph", Swipe => "swipe", Combo => "combo"]);
indexed_enum!(TransitionCycle, [Forward => "forward", Loop => "loop", PingPong => "ping-pong"]);
indexed_enum!(BurstFill, [Random => "random", Table => "table"]);
indexed_enum!(NoveltyAlgorithm, [
    BubbleSort => "bubble-sort",
    Xor => "xor",
    ExcitedString => "excited-string",
]);

impl FmRouting {
    /// Switch value meaning "carrier".
    pub const CARRIER_SLOT: i32 = 4;
    /// Switch value meaning "off".
    pub const OFF_SLOT: i32 = 5;

    /// Decode a routing switch value: 0-3 target an operator, 4 is the
    /// carrier, anything else is off.
    pub fn from_slot(slot: i32) -> Self {
        match slot {
            0..=3 => FmRouting::Modulates(slot as u8),
            Self::CARRIER_SLOT => FmRouting::Carrier,
            _ => FmRouting::Off,
        }
    }

    /// Inverse of [`FmRouting::from_slot`].
    pub fn slot(self) -> i32 {
        match self {
            FmRouting::Modulates(op) => op as i32,
            FmRouting::Carrier => Self::CARRIER_SLOT,
            FmRouting::Off => Self::OFF_SLOT,
        }
    }
}

/// Parameters of the two-table wavetable synth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavetableParams {
    pub wave1: Table,
    pub wave2: Table,
    /// Transition shape; 0 selects `wave1`, `TABLE_MAX - 1` selects `wave2`.
    pub transition: Table,
    /// Frames needed to traverse the transition table.
    pub transition_time: i32,
    pub algorithm: TransitionAlgorithm,
    pub cycle: TransitionCycle,
}

/// Parameters of the plucked-string synth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluckedParams {
    /// Sign-flip probability numerator over `TABLE_LENGTH - 1`.
    pub blend_factor: i32,
    pub burst_fill: BurstFill,
    pub burst_table: Table,
}

/// Parameters shared by the novelty algorithms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoveltyParams {
    pub algorithm: NoveltyAlgorithm,
    pub table: Table,
    /// Probability numerator, `0..TABLE_LENGTH`.
    pub slider: i32,
    pub fill: BurstFill,
}

/// Operator vectors of the FM synth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FmParams {
    /// Output level, `0..TABLE_LENGTH`.
    pub amps: [i32; FM_OPERATORS],
    pub routings: [FmRouting; FM_OPERATORS],
    /// Frequency multiple of the note.
    pub ratios: [i32; FM_OPERATORS],
}

impl FmParams {
    /// Build from the 8-slot editor vectors; only the first four slots are
    /// operators.
    pub fn from_ui_slots(
        amps: &[i32; FM_UI_SLOTS],
        routings: &[i32; FM_UI_SLOTS],
        ratios: &[i32; FM_UI_SLOTS],
    ) -> Self {
        let mut params = Self::default();
        for op in 0..FM_OPERATORS {
            params.amps[op] = amps[op];
            params.routings[op] = FmRouting::from_slot(routings[op]);
            params.ratios[op] = ratios[op];
        }
        params
    }
}

impl Default for FmParams {
    fn default() -> Self {
        Self {
            amps: [TABLE_LENGTH as i32 - 1, 0, 0, 0],
            routings: [FmRouting::Carrier, FmRouting::Off, FmRouting::Off, FmRouting::Off],
            ratios: [1; FM_OPERATORS],
        }
    }
}

/// Everything the UI can edit, for all synths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthParameters {
    pub wavetable: WavetableParams,
    pub plucked: PluckedParams,
    pub novelty: NoveltyParams,
    pub fm: FmParams,
}

impl Default for SynthParameters {
    fn default() -> Self {
        Self {
            wavetable: WavetableParams {
                wave1: [0; TABLE_LENGTH],
                wave2: [0; TABLE_LENGTH],
                transition: [0; TABLE_LENGTH],
                transition_time: 0,
                algorithm: TransitionAlgorithm::Morph,
                cycle: TransitionCycle::Forward,
            },
            plucked: PluckedParams {
                blend_factor: 0,
                burst_fill: BurstFill::Random,
                burst_table: [0; TABLE_LENGTH],
            },
            novelty: NoveltyParams {
                algorithm: NoveltyAlgorithm::BubbleSort,
                table: [0; TABLE_LENGTH],
                slider: 0,
                fill: BurstFill::Random,
            },
            fm: FmParams::default(),
        }
    }
}

/// True when every entry is a drawable value.
pub(crate) fn table_in_range(table: &[i16]) -> bool {
    table.iter().all(|&v| (0..TABLE_MAX as i16).contains(&v))
}

impl SynthParameters {
    /// Check that every table holds drawable values.
    pub fn tables_in_range(&self) -> bool {
        [
            &self.wavetable.wave1,
            &self.wavetable.wave2,
            &self.wavetable.transition,
            &self.plucked.burst_table,
            &self.novelty.table,
        ]
        .iter()
        .all(|t| table_in_range(&t[..]))
    }
}
