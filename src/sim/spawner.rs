//! Obstacle spawning
//!
//! One obstacle per elapsed spawn interval, placed just past the right edge.
//! The kind is drawn uniformly over every configured variant, so a family
//! with more variants (cacti) shows up proportionally more often.

use glam::Vec2;
use rand::Rng;

use super::clock::ClockAccumulator;
use super::state::{Altitude, Obstacle, ObstacleKind};
use crate::config::{
    ObstacleCatalog, RunConfig, SpawnGap, ViewportConfig, ordered_range, positive_interval,
};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    viewport: ViewportConfig,
    catalog: ObstacleCatalog,
    /// Inclusive gap range beyond the right edge
    gap: (f32, f32),
    interval: f64,
    clock: ClockAccumulator,
    next_id: u32,
}

impl ObstacleSpawner {
    pub fn new(
        viewport: ViewportConfig,
        catalog: ObstacleCatalog,
        gap: SpawnGap,
        interval: f64,
    ) -> Result<Self, ConfigError> {
        if catalog.kind_count() == 0 {
            return Err(ConfigError::NoObstacleKinds);
        }
        positive_interval("spawn_interval_ms", interval)?;
        let (min, max) = gap.range();
        ordered_range("spawn_gap", min, max)?;

        Ok(Self {
            viewport,
            catalog,
            gap: (min, max),
            interval,
            clock: ClockAccumulator::new(),
            next_id: 1,
        })
    }

    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.viewport,
            config.obstacles.clone(),
            config.spawn_gap,
            config.spawn_interval_ms,
        )
    }

    /// Feed a frame delta; returns an obstacle when a spawn interval elapsed.
    ///
    /// At most one obstacle comes out per frame. A long frame drains every
    /// whole interval it covers and keeps only the remainder, so a stall does
    /// not turn into a burst of stacked obstacles.
    pub fn try_spawn<R: Rng + ?Sized>(&mut self, delta: f64, rng: &mut R) -> Option<Obstacle> {
        self.clock.add(delta);
        let (elapsed, _) = self.clock.drain(self.interval);
        if elapsed == 0 {
            return None;
        }
        Some(self.spawn(rng))
    }

    /// Create one obstacle right now, ignoring the clock
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Obstacle {
        let ground_count = self.catalog.ground_widths.len();
        let pick = rng.random_range(0..self.catalog.kind_count());

        let (kind, width, lift) = if pick < ground_count {
            let kind = ObstacleKind::Ground {
                variant: pick as u32 + 1,
            };
            (kind, self.catalog.ground_widths[pick], 0.0)
        } else {
            let index = pick - ground_count;
            let (altitude, lift) = if rng.random_bool(0.5) {
                (Altitude::Low, self.catalog.low_altitude)
            } else {
                (Altitude::High, self.catalog.high_altitude)
            };
            let kind = ObstacleKind::Flying {
                variant: index as u32 + 1,
                altitude,
            };
            (kind, self.catalog.flying_widths[index], lift)
        };

        let (min_gap, max_gap) = self.gap;
        let x = self.viewport.width + rng.random_range(min_gap..=max_gap);
        let y = self.viewport.height - lift;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        log::debug!("Spawned obstacle {} ({}) at x={:.1}", id, kind.sprite_key(), x);

        Obstacle {
            id,
            kind,
            pos: Vec2::new(x, y),
            width,
            immovable: true,
        }
    }

    /// Time accumulated toward the next spawn (ms)
    pub fn time_since_last_spawn(&self) -> f64 {
        self.clock.accumulated()
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Restart spawn timing. Entity ids keep counting up.
    pub fn reset(&mut self) {
        self.clock.reset();
    }
}
