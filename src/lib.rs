//! Dino Run - simulation core for an endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (state machine, spawning, scrolling, scoring)
//! - `config`: Data-driven tuning and viewport settings
//! - `error`: Configuration errors
//!
//! Rendering, audio playback, input polling and collision geometry live in the
//! host. The simulation talks to them through [`sim::FrameInput`] on the way in
//! and [`sim::GameEvent`] on the way out.

pub mod config;
pub mod error;
pub mod sim;

pub use config::{ObstacleCatalog, RampConfig, RunConfig, SpawnGap, ViewportConfig};
pub use error::ConfigError;

/// Default tuning constants
pub mod consts {
    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 1000.0;
    pub const VIEWPORT_HEIGHT: f32 = 340.0;

    /// Obstacle scroll speed in pixels per frame (before modifier)
    pub const BASE_SPEED: f32 = 6.5;
    /// Speed modifier increase per milestone
    pub const SPEED_STEP: f32 = 0.2;
    /// Points between speed milestones
    pub const MILESTONE_SIZE: u32 = 100;

    /// Milliseconds per score point
    pub const SCORE_INTERVAL_MS: f64 = 100.0;
    /// Milliseconds between obstacle spawns
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;

    /// Spawn gap ranges beyond the right edge (inclusive)
    pub const TIGHT_GAP: (f32, f32) = (150.0, 300.0);
    pub const WIDE_GAP: (f32, f32) = (600.0, 900.0);

    /// Flying obstacle heights above the ground line
    pub const FLYING_ALTITUDES: [f32; 2] = [20.0, 70.0];

    /// Cloud drift in pixels per frame
    pub const DECORATION_SPEED: f32 = 0.5;
    /// Extra random offset when a cloud wraps back to the right edge
    pub const DECORATION_WRAP_JITTER: f32 = 100.0;
    pub const CLOUD_WIDTH: f32 = 46.0;

    /// Intro ramp: ground starts this wide and grows per tick
    pub const RAMP_START_WIDTH: f32 = 88.0;
    pub const RAMP_INCREMENT: f32 = 30.0;
    /// Horizontal velocity forced on the player during the ramp (px/s)
    pub const RAMP_PLAYER_VELOCITY: f32 = 80.0;

    /// Start trigger sits this far above the ground line
    pub const START_TRIGGER_OFFSET: f32 = 10.0;
    /// Where the start trigger is parked once used
    pub const OFF_FIELD: f32 = 9999.0;

    /// Width of the score display in digits
    pub const SCORE_DIGITS: usize = 5;
}

/// Format a score as a fixed-width, zero-padded decimal string.
///
/// Scores above 99999 keep their full digits rather than wrapping.
#[inline]
pub fn format_score(score: u32) -> String {
    format!("{:0width$}", score, width = consts::SCORE_DIGITS)
}

/// Format the high score line shown next to the score
#[inline]
pub fn format_high_score(high_score: u32) -> String {
    format!("HI {}", format_score(high_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_score_padding() {
        assert_eq!(format_score(0), "00000");
        assert_eq!(format_score(7), "00007");
        assert_eq!(format_score(12345), "12345");
        assert_eq!(format_score(99999), "99999");
    }

    #[test]
    fn test_format_high_score() {
        assert_eq!(format_high_score(42), "HI 00042");
    }

    proptest! {
        #[test]
        fn prop_format_score_is_five_chars(score in 0u32..=99_999) {
            let text = format_score(score);
            prop_assert_eq!(text.len(), 5);
            prop_assert!(text.chars().all(|c| c.is_ascii_digit()));
            prop_assert_eq!(text.parse::<u32>().unwrap(), score);
        }
    }
}
