//! Scroll speed and horizontal motion
//!
//! Speeds are per-frame increments, not per-second rates: a frame moves every
//! obstacle left by `effective_speed()` pixels regardless of its delta.

use rand::Rng;

use super::state::{Decoration, Obstacle};
use crate::config::{RunConfig, ViewportConfig, ordered_range, positive};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ScrollModel {
    viewport: ViewportConfig,
    base_speed: f32,
    speed_step: f32,
    /// 1.0 at the start of every run, only grows within a run
    speed_modifier: f32,
    decoration_speed: f32,
    wrap_jitter: f32,
    /// Ground texture offset, for the renderer's tiling
    ground_offset: f32,
}

impl ScrollModel {
    pub fn new(
        viewport: ViewportConfig,
        base_speed: f32,
        speed_step: f32,
        decoration_speed: f32,
        wrap_jitter: f32,
    ) -> Result<Self, ConfigError> {
        positive("base_speed", base_speed as f64)?;
        positive("speed_step", speed_step as f64)?;
        positive("decoration_speed", decoration_speed as f64)?;
        ordered_range("decoration_wrap_jitter", 0.0, wrap_jitter)?;

        Ok(Self {
            viewport,
            base_speed,
            speed_step,
            speed_modifier: 1.0,
            decoration_speed,
            wrap_jitter,
            ground_offset: 0.0,
        })
    }

    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.viewport,
            config.base_speed,
            config.speed_step,
            config.decoration_speed,
            config.decoration_wrap_jitter,
        )
    }

    #[inline]
    pub fn effective_speed(&self) -> f32 {
        self.base_speed * self.speed_modifier
    }

    pub fn speed_modifier(&self) -> f32 {
        self.speed_modifier
    }

    pub fn ground_offset(&self) -> f32 {
        self.ground_offset
    }

    /// Move everything one frame to the left.
    ///
    /// Clouds that leave the screen reappear past the right edge; obstacles
    /// are left for the caller to retire.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        obstacles: &mut [Obstacle],
        decorations: &mut [Decoration],
        rng: &mut R,
    ) {
        let speed = self.effective_speed();
        for obstacle in obstacles.iter_mut() {
            obstacle.pos.x -= speed;
        }

        for cloud in decorations.iter_mut() {
            cloud.pos.x -= self.decoration_speed;
            if cloud.right_edge() < 0.0 {
                cloud.pos.x = self.viewport.width + rng.random_range(0.0..=self.wrap_jitter);
            }
        }

        self.ground_offset += speed;
    }

    /// Apply one milestone crossing; returns the new modifier
    pub fn on_milestone(&mut self) -> f32 {
        self.speed_modifier += self.speed_step;
        self.speed_modifier
    }

    /// Back to the starting speed
    pub fn reset(&mut self) {
        self.speed_modifier = 1.0;
    }
}
