//! Deterministic variate source that replays a fixed buffer.

use super::NormalSource;

/// Replays a fixed sequence of draws, wrapping around when exhausted.
///
/// Useful for pinning exact paths in tests: `ReplaySource::new(vec![0.0])`
/// yields the drift-only path, a row of `z` values reproduces a hand
/// computation step by step.
///
/// # Examples
///
/// ```rust
/// use risk_engine::rng::{NormalSource, ReplaySource};
///
/// let mut source = ReplaySource::new(vec![1.0, -1.0]);
/// let mut buffer = [0.0; 5];
/// source.fill_standard_normal(&mut buffer);
/// assert_eq!(buffer, [1.0, -1.0, 1.0, -1.0, 1.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaySource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    /// Creates a source replaying `draws`. An empty sequence replays zeros.
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// A source that always yields 0, the drift-only path.
    pub fn zeros() -> Self {
        Self::new(Vec::new())
    }

    /// Number of draws handed out so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl NormalSource for ReplaySource {
    fn fill_standard_normal(&mut self, buffer: &mut [f64]) {
        if self.draws.is_empty() {
            buffer.fill(0.0);
            self.cursor += buffer.len();
            return;
        }
        for value in buffer.iter_mut() {
            *value = self.draws[self.cursor % self.draws.len()];
            self.cursor += 1;
        }
    }
}
