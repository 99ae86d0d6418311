//! Run state and core simulation types
//!
//! Positions use screen space: x grows to the right, y grows downward, and
//! the ground line is `y = viewport.height`. Obstacles are anchored at their
//! bottom-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::OFF_FIELD;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Waiting for the player to touch the start trigger
    Idle,
    /// Ground ramp-in playing, player auto-running
    Starting,
    /// Normal play
    Running,
    /// Collision happened, waiting for restart
    Ended,
}

/// Height band for flying obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Altitude {
    Low,
    High,
}

/// Obstacle types. Variants are 1-based to match sprite names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground { variant: u32 },
    Flying { variant: u32, altitude: Altitude },
}

impl ObstacleKind {
    /// Sprite key the renderer should use
    pub fn sprite_key(&self) -> String {
        match self {
            ObstacleKind::Ground { variant } => format!("obstacle-{}", variant),
            ObstacleKind::Flying { variant: 1, .. } => "enemy-bird".to_string(),
            ObstacleKind::Flying { variant, .. } => format!("enemy-bird-{}", variant),
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, ObstacleKind::Flying { .. })
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Bottom-left corner
    pub pos: Vec2,
    pub width: f32,
    /// Never pushed by collision response; only the scroll moves it
    pub immovable: bool,
}

impl Obstacle {
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Fully scrolled past the left edge of the screen
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.right_edge() < 0.0
    }
}

/// Background element (cloud) that loops forever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub pos: Vec2,
    pub width: f32,
}

impl Decoration {
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// The slice of the player body the core commands.
///
/// The host physics integrates position and applies jumps; the core only
/// forces velocities at state transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Invisible sensor that starts the first run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartTrigger {
    pub pos: Vec2,
    pub active: bool,
}

impl StartTrigger {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, active: true }
    }

    /// Park the sensor off-field so it can never overlap again
    pub fn disable(&mut self) {
        self.pos = Vec2::splat(OFF_FIELD);
        self.active = false;
    }
}

/// Named animation triggers for the animation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    Run,
    /// Played by the player entity on jump input; the run machine never emits it
    Jump,
    Death,
    /// Queued once when the machine is built
    Idle,
}

impl AnimationCue {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationCue::Run => "play-run",
            AnimationCue::Jump => "play-jump",
            AnimationCue::Death => "play-death",
            AnimationCue::Idle => "play-idle",
        }
    }
}

/// Commands and notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play a named animation on the player
    Animation(AnimationCue),
    PauseAnimations,
    ResumeAnimations,
    PausePhysics,
    ResumePhysics,
    /// Start trigger touched; ground begins to widen
    RampStarted,
    /// Ramp finished; show clouds and score
    RunStarted,
    ObstacleSpawned { id: u32 },
    /// Play the milestone sound and flash the score
    MilestoneReached { score: u32, speed_modifier: f32 },
    /// Show the game-over panel and high score
    GameOver {
        score: u32,
        high_score: u32,
        new_high_score: bool,
    },
    /// Hide the game-over panel
    Restarted,
}

/// Everything the display collaborator needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: String,
    pub high_score: String,
    pub is_running: bool,
    pub is_game_over: bool,
    pub score_visible: bool,
    pub high_score_visible: bool,
    pub decorations_visible: bool,
}
