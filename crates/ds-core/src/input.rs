//! Decoding of button and piano-key bitmasks.
//!
//! Hardware scanning happens elsewhere; these helpers only translate the
//! edge masks it reports into logical keys and gestures.

use arrayvec::ArrayVec;

use crate::geometry::VOICE_COUNT;

/// Button bitmask in the console's key register layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const A: Buttons = Buttons(1 << 0);
    pub const B: Buttons = Buttons(1 << 1);
    pub const SELECT: Buttons = Buttons(1 << 2);
    pub const START: Buttons = Buttons(1 << 3);
    pub const RIGHT: Buttons = Buttons(1 << 4);
    pub const LEFT: Buttons = Buttons(1 << 5);
    pub const UP: Buttons = Buttons(1 << 6);
    pub const DOWN: Buttons = Buttons(1 << 7);
    pub const R: Buttons = Buttons(1 << 8);
    pub const L: Buttons = Buttons(1 << 9);
    pub const X: Buttons = Buttons(1 << 10);
    pub const Y: Buttons = Buttons(1 << 11);

    /// True if any bit of `other` is set.
    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 != 0
    }

    /// True if no button is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

/// Raw 16-bit piano add-on mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PianoKeys(pub u16);

/// Mask bit for each logical key. Bits 11 and 12 are unused by the
/// hardware, so B and high C sit at 13 and 14.
const PIANO_KEY_BITS: [u8; VOICE_COUNT] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 13, 14];

impl PianoKeys {
    /// Mask with only logical key `key` set.
    pub fn from_key(key: usize) -> Self {
        PIANO_KEY_BITS
            .get(key)
            .map(|bit| PianoKeys(1 << bit))
            .unwrap_or_default()
    }

    /// Union of two masks.
    pub fn with(self, other: PianoKeys) -> Self {
        PianoKeys(self.0 | other.0)
    }
}

/// Logical key indices (0-12) present in `mask`, in ascending order.
pub fn decode_piano_mask(mask: PianoKeys) -> ArrayVec<usize, VOICE_COUNT> {
    PIANO_KEY_BITS
        .iter()
        .enumerate()
        .filter(|(_, bit)| mask.0 & (1 << **bit) != 0)
        .map(|(key, _)| key)
        .collect()
}

/// The export gesture: up up down down left right A B start.
pub const KONAMI_SEQUENCE: [Buttons; 9] = [
    Buttons::UP,
    Buttons::UP,
    Buttons::DOWN,
    Buttons::DOWN,
    Buttons::LEFT,
    Buttons::RIGHT,
    Buttons::A,
    Buttons::B,
    Buttons::START,
];

/// Watches button-down events for [`KONAMI_SEQUENCE`].
#[derive(Clone, Debug, Default)]
pub struct KonamiDetector {
    matched: usize,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one non-empty button-down mask. Returns true when the sequence
    /// completes; the detector then starts over.
    pub fn next(&mut self, down: Buttons) -> bool {
        if down.contains(KONAMI_SEQUENCE[self.matched]) {
            self.matched += 1;
        } else {
            self.matched = 0;
        }

        if self.matched == KONAMI_SEQUENCE.len() {
            self.matched = 0;
            true
        } else {
            false
        }
    }
}
