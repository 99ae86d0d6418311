//! Run configuration and tuning
//!
//! Everything the simulation reads at construction time lives here. Defaults
//! match the classic game's feel; a JSON file can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Visible play area, passed to every component that places things on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    /// Also the ground line: obstacles and the player stand on `y = height`
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Horizontal gap between the right edge and a freshly spawned obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum SpawnGap {
    #[default]
    Tight,
    Wide,
    Custom { min: f32, max: f32 },
}

impl SpawnGap {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnGap::Tight => "Tight",
            SpawnGap::Wide => "Wide",
            SpawnGap::Custom { .. } => "Custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tight" => Some(SpawnGap::Tight),
            "wide" => Some(SpawnGap::Wide),
            _ => None,
        }
    }

    /// Inclusive (min, max) gap in pixels
    pub fn range(&self) -> (f32, f32) {
        match *self {
            SpawnGap::Tight => TIGHT_GAP,
            SpawnGap::Wide => WIDE_GAP,
            SpawnGap::Custom { min, max } => (min, max),
        }
    }
}

/// Obstacle sprites the spawner can choose from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleCatalog {
    /// Width of each ground obstacle variant (variant `n` is at index `n - 1`)
    pub ground_widths: Vec<f32>,
    /// Width of each flying obstacle variant
    pub flying_widths: Vec<f32>,
    /// Height above the ground line for `Altitude::Low`
    pub low_altitude: f32,
    /// Height above the ground line for `Altitude::High`
    pub high_altitude: f32,
}

impl Default for ObstacleCatalog {
    fn default() -> Self {
        Self {
            // Single, double and triple cactus in small and large sizes
            ground_widths: vec![17.0, 34.0, 51.0, 25.0, 50.0, 75.0],
            flying_widths: vec![46.0],
            low_altitude: FLYING_ALTITUDES[0],
            high_altitude: FLYING_ALTITUDES[1],
        }
    }
}

impl ObstacleCatalog {
    /// Total number of kinds a spawn draws from
    pub fn kind_count(&self) -> usize {
        self.ground_widths.len() + self.flying_widths.len()
    }
}

/// Intro ramp-in tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    /// Ground width before the ramp starts
    pub start_width: f32,
    /// Ground growth per ramp tick
    pub increment: f32,
    /// Forced horizontal velocity on the player while ramping
    pub player_velocity: f32,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            start_width: RAMP_START_WIDTH,
            increment: RAMP_INCREMENT,
            player_velocity: RAMP_PLAYER_VELOCITY,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub viewport: ViewportConfig,

    // === Speed ===
    /// Obstacle scroll per frame at modifier 1.0
    pub base_speed: f32,
    /// Modifier increase per milestone
    pub speed_step: f32,
    /// Points between milestones
    pub milestone_size: u32,

    // === Timing ===
    pub score_interval_ms: f64,
    pub spawn_interval_ms: f64,

    // === Spawning ===
    pub spawn_gap: SpawnGap,
    pub obstacles: ObstacleCatalog,

    // === Background ===
    /// Cloud drift per frame
    pub decoration_speed: f32,
    /// Upper bound of the random offset added when a cloud wraps
    pub decoration_wrap_jitter: f32,

    // === Intro ===
    pub ramp: RampConfig,
    /// Height of the start trigger above the ground line
    pub start_trigger_offset: f32,

    /// RNG seed for reproducible runs
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),

            base_speed: BASE_SPEED,
            speed_step: SPEED_STEP,
            milestone_size: MILESTONE_SIZE,

            score_interval_ms: SCORE_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,

            spawn_gap: SpawnGap::Tight,
            obstacles: ObstacleCatalog::default(),

            decoration_speed: DECORATION_SPEED,
            decoration_wrap_jitter: DECORATION_WRAP_JITTER,

            ramp: RampConfig::default(),
            start_trigger_offset: START_TRIGGER_OFFSET,

            seed: 0,
        }
    }
}

impl RunConfig {
    /// Default configuration with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded run config from {}", path.display());
        Ok(config)
    }

    /// Reject anything that would make the simulation divide by zero,
    /// loop forever or draw from an empty range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(e) = &result {
            log::warn!("Rejected run config: {}", e);
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        let ViewportConfig { width, height } = self.viewport;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::InvalidViewport { width, height });
        }

        positive_interval("score_interval_ms", self.score_interval_ms)?;
        positive_interval("spawn_interval_ms", self.spawn_interval_ms)?;

        positive("base_speed", self.base_speed as f64)?;
        positive("speed_step", self.speed_step as f64)?;
        positive("milestone_size", self.milestone_size as f64)?;
        positive("ramp.increment", self.ramp.increment as f64)?;
        positive("ramp.player_velocity", self.ramp.player_velocity as f64)?;
        positive("decoration_speed", self.decoration_speed as f64)?;
        // Clouds are background: they drift slower than the obstacles
        ordered_range("decoration_speed", self.decoration_speed, self.base_speed)?;
        ordered_range("ramp.start_width", 0.0, self.ramp.start_width)?;
        ordered_range("start_trigger_offset", 0.0, self.start_trigger_offset)?;

        let (min, max) = self.spawn_gap.range();
        ordered_range("spawn_gap", min, max)?;
        ordered_range("decoration_wrap_jitter", 0.0, self.decoration_wrap_jitter)?;

        if self.obstacles.kind_count() == 0 {
            return Err(ConfigError::NoObstacleKinds);
        }
        for &w in self
            .obstacles
            .ground_widths
            .iter()
            .chain(&self.obstacles.flying_widths)
        {
            positive("obstacle width", w as f64)?;
        }
        ordered_range(
            "flying altitudes",
            self.obstacles.low_altitude,
            self.obstacles.high_altitude,
        )?;

        Ok(())
    }
}

pub(crate) fn positive_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveInterval { field, value })
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ordered_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    // NaN fails the comparison as well
    if min <= max && min.is_finite() && max.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            min: min as f64,
            max: max as f64,
        })
    }
}
