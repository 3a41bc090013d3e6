//! Cyclic cursor over a fixed sequence.

/// A cursor that walks a fixed-size list in either direction, wrapping at
/// both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    len: usize,
    current: usize,
}

impl Ring {
    /// Cursor at position 0 of a sequence of `len` items (`len >= 1`).
    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            current: 0,
        }
    }

    /// Current position.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Move forward one position and return it.
    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.len;
        self.current
    }

    /// Move back one position and return it.
    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.len - 1) % self.len;
        self.current
    }

    /// Jump to `index` modulo the length.
    pub fn select(&mut self, index: usize) {
        self.current = index % self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_both_ways() {
        let mut ring = Ring::new(3);
        assert_eq!(ring.prev(), 2);
        assert_eq!(ring.next(), 0);
        assert_eq!(ring.next(), 1);
        assert_eq!(ring.next(), 2);
        assert_eq!(ring.next(), 0);
    }

    #[test]
    fn select_is_modular() {
        let mut ring = Ring::new(5);
        ring.select(7);
        assert_eq!(ring.current(), 2);
    }
}
