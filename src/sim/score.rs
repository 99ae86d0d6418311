//! Score cadence, milestones and the session high score
//!
//! The high score lives in memory only and never goes down.

use serde::{Deserialize, Serialize};

use super::clock::ClockAccumulator;
use crate::config::{RunConfig, positive, positive_interval};
use crate::error::ConfigError;
use crate::{format_high_score, format_score};

/// Result of feeding one frame delta to the tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTick {
    pub score_changed: bool,
    /// Milestone scores crossed during this tick, in order
    pub milestones: Vec<u32>,
}

impl ScoreTick {
    pub fn milestone_hit(&self) -> bool {
        !self.milestones.is_empty()
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
}

#[derive(Debug, Clone)]
pub struct ScoreTracker {
    score: u32,
    high_score: u32,
    /// Score the last run ended with, shown until the next run begins
    last_run: Option<u32>,
    clock: ClockAccumulator,
    interval: f64,
    milestone_size: u32,
}

impl ScoreTracker {
    pub fn new(interval: f64, milestone_size: u32) -> Result<Self, ConfigError> {
        positive_interval("score_interval_ms", interval)?;
        positive("milestone_size", milestone_size as f64)?;
        Ok(Self {
            score: 0,
            high_score: 0,
            last_run: None,
            clock: ClockAccumulator::new(),
            interval,
            milestone_size,
        })
    }

    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Self::new(config.score_interval_ms, config.milestone_size)
    }

    /// Add a frame delta and award one point per whole interval elapsed
    pub fn tick(&mut self, delta: f64) -> ScoreTick {
        self.clock.add(delta);
        let (points, _) = self.clock.drain(self.interval);
        if points == 0 {
            return ScoreTick::default();
        }

        let before = self.score;
        self.score = self.score.saturating_add(points);

        // Multiples of the milestone size in (before, score]
        let m = self.milestone_size;
        let first = before / m + 1;
        let last = self.score / m;
        let milestones = (first..=last).map(|k| k * m).collect();

        ScoreTick {
            score_changed: self.score != before,
            milestones,
        }
    }

    /// Close out the run: fold the score into the high score and zero the
    /// counters. The final score stays on display via [`Self::display_score`].
    pub fn finish_run(&mut self) -> RunResult {
        let score = self.score;
        let new_high_score = score > self.high_score;
        self.high_score = self.high_score.max(score);
        self.last_run = Some(score);
        self.reset();

        RunResult {
            score,
            high_score: self.high_score,
            new_high_score,
        }
    }

    /// Start counting a fresh run
    pub fn begin_run(&mut self) {
        self.last_run = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.score = 0;
        self.clock.reset();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Time accumulated toward the next point (ms)
    pub fn pending_time(&self) -> f64 {
        self.clock.accumulated()
    }

    /// The score the display should show right now
    pub fn display_score(&self) -> u32 {
        self.last_run.unwrap_or(self.score)
    }

    pub fn score_text(&self) -> String {
        format_score(self.display_score())
    }

    pub fn high_score_text(&self) -> String {
        format_high_score(self.high_score)
    }
}
