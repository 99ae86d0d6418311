//! Intro ramp-in: the ground widens to full screen before the run starts
//!
//! Stepped once per frame by the state machine. Completion is checked inline
//! on the step that reaches the target; stepping a finished ramp does nothing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    start: f32,
    target: f32,
    increment: f32,
    ticks: u32,
    complete: bool,
}

impl Ramp {
    pub fn new(start: f32, target: f32, increment: f32) -> Self {
        Self {
            start,
            target,
            increment,
            ticks: 0,
            complete: false,
        }
    }

    /// Number of steps a ramp with these parameters takes to complete.
    /// There is always at least one step.
    pub fn ticks_to_complete(start: f32, target: f32, increment: f32) -> u32 {
        (((target - start) / increment).ceil() as u32).max(1)
    }

    /// Advance one tick. Returns true only on the tick that completes the ramp.
    pub fn step(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.ticks += 1;
        if self.start + self.ticks as f32 * self.increment >= self.target {
            self.complete = true;
        }
        self.complete
    }

    /// Current ground width, clamped to the target
    pub fn progress(&self) -> f32 {
        (self.start + self.ticks as f32 * self.increment).min(self.target)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
