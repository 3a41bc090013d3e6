//! Sample-and-hold rate conversion from a synth's rate to the device rate.

use ds_engine::Frame;

/// Repeats or skips source frames so a source running at any rate can feed
/// a fixed-rate device. Integer-only; the source rate may change between
/// calls.
#[derive(Clone, Debug)]
pub struct HoldResampler {
    target_rate: u32,
    phase: u64,
    current: Frame,
}

impl HoldResampler {
    pub fn new(target_rate: u32) -> Self {
        Self {
            target_rate: target_rate.max(1),
            // Pull a source frame on the first call
            phase: target_rate.max(1) as u64,
            current: Frame::silence(),
        }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Produce one output frame, pulling as many source frames from `pull`
    /// as the rates require.
    pub fn next(&mut self, source_rate: u32, mut pull: impl FnMut() -> Frame) -> Frame {
        let target = self.target_rate as u64;
        while self.phase >= target {
            self.current = pull();
            self.phase -= target;
        }
        self.phase += source_rate as u64;
        self.current
    }
}
