//! Deterministic xorshift32 generator.
//!
//! Always starts from the same seed so a performance replays identically;
//! noise-driven algorithms and exports stay reproducible.

/// Fixed non-zero seed for every generator instance.
pub const XORSHIFT_SEED: u32 = 347_810;

/// Marsaglia's 32-bit xorshift (shifts 13, 17, 5).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Create a generator at the fixed seed.
    pub const fn new() -> Self {
        Self { state: XORSHIFT_SEED }
    }

    /// Advance and return the next word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// True half of the time.
    #[inline]
    pub fn coin_flip(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }

    /// True roughly `a` out of `b` times.
    ///
    /// `a == 0` never passes and `a == b` always passes without drawing.
    /// A zero `b` with non-zero `a` also always passes.
    pub fn prob(&mut self, a: u32, b: u32) -> bool {
        if a == 0 {
            false
        } else if a == b || b == 0 {
            true
        } else {
            self.next_u32() % b <= a
        }
    }

    /// Fill `buffer` with values in `0..max`.
    pub fn fill(&mut self, buffer: &mut [i16], max: u32) {
        for slot in buffer.iter_mut() {
            *slot = if max == 0 { 0 } else { (self.next_u32() % max) as i16 };
        }
    }

    /// Uniform value in `0..max` (0 when `max` is 0).
    #[inline]
    pub fn below(&mut self, max: u32) -> i16 {
        if max == 0 {
            0
        } else {
            (self.next_u32() % max) as i16
        }
    }
}

impl Default for Xorshift32 {
    fn default() -> Self {
        Self::new()
    }
}
