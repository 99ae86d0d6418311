//! Error types for Dino Run
//!
//! Only configuration can fail. Once a [`RunStateMachine`](crate::sim::RunStateMachine)
//! exists, every runtime condition is a state transition or a no-op.

use thiserror::Error;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no obstacle kinds configured")]
    NoObstacleKinds,

    #[error("{field} must be a positive interval, got {value}ms")]
    NonPositiveInterval { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("invalid range for {field}: min {min} > max {max}")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
