//! Deterministic run simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame deltas in, events out
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod ramp;
pub mod run;
pub mod score;
pub mod scroll;
pub mod spawner;
pub mod state;

pub use clock::ClockAccumulator;
pub use ramp::Ramp;
pub use run::{CollisionEvent, FrameInput, RunStateMachine};
pub use score::{RunResult, ScoreTick, ScoreTracker};
pub use scroll::ScrollModel;
pub use spawner::ObstacleSpawner;
pub use state::{
    Altitude, AnimationCue, Decoration, GameEvent, Hud, Obstacle, ObstacleKind, PlayerBody,
    RunState, StartTrigger,
};
