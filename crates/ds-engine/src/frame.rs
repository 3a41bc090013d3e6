//! Audio frame type.

/// A mono audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame(pub i16);

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self(0)
    }

    /// The raw sample.
    pub const fn value(self) -> i16 {
        self.0
    }

    /// Sample scaled to `-1.0..1.0` for float sinks.
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 32768.0
    }
}

impl From<i16> for Frame {
    fn from(value: i16) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_conversion_bounds() {
        assert_eq!(Frame::silence().to_f32(), 0.0);
        assert_eq!(Frame(i16::MIN).to_f32(), -1.0);
        assert!(Frame(i16::MAX).to_f32() < 1.0);
    }
}
