//! Variable-length per-voice buffers for the string algorithms.

use arrayvec::ArrayVec;
use ds_core::{lerp, BurstFill, Table, Xorshift32, MAX_BURST_LENGTH, TABLE_LENGTH, TABLE_MAX};

/// Buffer length for one period of `freq`, clamped to `1..=MAX_BURST_LENGTH`.
pub(crate) fn burst_length(sample_rate: u32, freq: i32) -> usize {
    if freq <= 0 {
        return 1;
    }
    (sample_rate as usize / freq as usize).clamp(1, MAX_BURST_LENGTH)
}

/// One voice's delay line.
pub(crate) struct Burst {
    pub table: ArrayVec<i32, MAX_BURST_LENGTH>,
    pub previous: i32,
    pub phase: usize,
}

impl Burst {
    pub fn new() -> Self {
        Self {
            table: ArrayVec::new(),
            previous: 0,
            phase: 0,
        }
    }

    /// Refill with `length` values from noise or a resampled `source`.
    pub fn seed(&mut self, length: usize, fill: BurstFill, source: &Table, rng: &mut Xorshift32) {
        let length = length.clamp(1, MAX_BURST_LENGTH);
        self.table.clear();
        match fill {
            BurstFill::Random => {
                for _ in 0..length {
                    self.table.push(rng.below(TABLE_MAX as u32) as i32);
                }
            }
            BurstFill::Table => {
                let last = length as i32 - 1;
                for i in 0..length as i32 {
                    let index = lerp(0, TABLE_LENGTH as i32 - 1, i, last);
                    self.table.push(source[index as usize] as i32);
                }
            }
        }
        self.phase = 0;
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}
