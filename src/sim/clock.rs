//! Millisecond accumulator shared by spawn and score timing

use serde::{Deserialize, Serialize};

/// Turns a stream of frame deltas into whole elapsed intervals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockAccumulator {
    accumulated: f64,
}

impl ClockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame delta (ms). Negative or NaN deltas count as zero.
    pub fn add(&mut self, delta: f64) -> f64 {
        if delta > 0.0 {
            self.accumulated += delta;
        }
        self.accumulated
    }

    /// Time accumulated since the last drained interval
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Consume every whole `interval` held, returning how many were consumed
    /// and the remainder left behind.
    pub fn drain(&mut self, interval: f64) -> (u32, f64) {
        debug_assert!(interval > 0.0, "drain interval must be positive");
        if !(interval > 0.0) || self.accumulated < interval {
            return (0, self.accumulated);
        }

        // Anything past u32::MAX intervals stays in the remainder
        let count = (self.accumulated / interval).floor().min(u32::MAX as f64);
        self.accumulated = (self.accumulated - count * interval).max(0.0);
        (count as u32, self.accumulated)
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
