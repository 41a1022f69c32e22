//! Fixed-capacity spread history.

use crate::config::SPREAD_HISTORY_LEN;

/// Ring buffer of the last 120 cross-exchange spread samples (decimal
/// fractions). The buffer starts zero-filled and is always exactly full:
/// pushing overwrites the oldest slot, it never resizes.
#[derive(Debug, Clone)]
pub struct SpreadHistory {
    buf: Vec<f64>,
    /// Index of the oldest sample, i.e. the next slot to overwrite.
    head: usize,
}

impl Default for SpreadHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadHistory {
    pub fn new() -> Self {
        Self {
            buf: vec![0.0; SPREAD_HISTORY_LEN],
            head: 0,
        }
    }

    /// Overwrite the oldest sample with `sample`.
    pub fn push(&mut self, sample: f64) {
        self.buf[self.head] = sample;
        self.head = (self.head + 1) % self.buf.len();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Samples oldest-first, as an owned copy for snapshot consumers.
    pub fn samples(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.buf.len());
        out.extend_from_slice(&self.buf[self.head..]);
        out.extend_from_slice(&self.buf[..self.head]);
        out
    }
}
