//! Run state machine
//!
//! Owns every piece of mutable run state and drives the spawner, scroll model
//! and score tracker once per frame. The host feeds in overlap reports through
//! [`FrameInput`] and drains [`GameEvent`]s for its animation, audio and UI
//! collaborators.
//!
//! Counters (score, spawn timing, speed modifier) reset at the moment of
//! collision. Restart only resumes play and clears obstacles.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ramp::Ramp;
use super::score::ScoreTracker;
use super::scroll::ScrollModel;
use super::spawner::ObstacleSpawner;
use super::state::{
    AnimationCue, Decoration, GameEvent, Hud, Obstacle, PlayerBody, RunState, StartTrigger,
};
use crate::config::{RampConfig, RunConfig, ViewportConfig};
use crate::consts::CLOUD_WIDTH;
use crate::error::ConfigError;

/// Player touched an obstacle this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub obstacle_id: u32,
}

/// Overlap reports from the physics collaborator for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Player overlaps the start trigger
    pub start_trigger_overlap: bool,
    /// Player hit an obstacle
    pub collision: Option<CollisionEvent>,
}

impl FrameInput {
    pub fn start() -> Self {
        Self {
            start_trigger_overlap: true,
            ..Default::default()
        }
    }

    pub fn collision(obstacle_id: u32) -> Self {
        Self {
            collision: Some(CollisionEvent { obstacle_id }),
            ..Default::default()
        }
    }
}

pub struct RunStateMachine {
    state: RunState,
    viewport: ViewportConfig,
    ramp_config: RampConfig,
    ramp: Option<Ramp>,

    spawner: ObstacleSpawner,
    scroll: ScrollModel,
    score: ScoreTracker,
    rng: Pcg32,

    obstacles: Vec<Obstacle>,
    decorations: Vec<Decoration>,
    player: PlayerBody,
    start_trigger: StartTrigger,
    ground_width: f32,

    // UI / collaborator state
    score_visible: bool,
    high_score_visible: bool,
    decorations_visible: bool,
    game_over_visible: bool,
    physics_paused: bool,
    animations_paused: bool,

    events: Vec<GameEvent>,
}

impl RunStateMachine {
    /// Validate the configuration and build every component from it
    pub fn new(config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = ObstacleSpawner::from_config(config)?;
        let scroll = ScrollModel::from_config(config)?;
        let score = ScoreTracker::from_config(config)?;
        Self::with_components(config, spawner, scroll, score)
    }

    /// Assemble a machine around components built elsewhere.
    ///
    /// The config still has to validate: it supplies the ramp and viewport.
    pub fn with_components(
        config: &RunConfig,
        spawner: ObstacleSpawner,
        scroll: ScrollModel,
        score: ScoreTracker,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = config.viewport;
        let ground = viewport.height;

        Ok(Self {
            state: RunState::Idle,
            viewport,
            ramp_config: config.ramp,
            ramp: None,

            spawner,
            scroll,
            score,
            rng: Pcg32::seed_from_u64(config.seed),

            obstacles: Vec::new(),
            decorations: default_decorations(viewport),
            player: PlayerBody {
                pos: Vec2::new(0.0, ground),
                vel: Vec2::ZERO,
            },
            start_trigger: StartTrigger::new(Vec2::new(0.0, ground - config.start_trigger_offset)),
            ground_width: config.ramp.start_width.min(viewport.width),

            score_visible: false,
            high_score_visible: false,
            decorations_visible: false,
            game_over_visible: false,
            physics_paused: false,
            animations_paused: false,

            // Player stands still until the start trigger is touched
            events: vec![GameEvent::Animation(AnimationCue::Idle)],
        })
    }

    /// Advance the simulation by one frame (`delta` in ms)
    pub fn update(&mut self, delta: f64, input: &FrameInput) {
        match self.state {
            RunState::Idle => {
                if input.start_trigger_overlap && self.start_trigger.active {
                    self.begin_ramp();
                }
            }
            RunState::Starting => self.advance_ramp(),
            RunState::Running => {
                self.advance_run(delta);
                // Positions are already advanced for this frame; no rollback
                if let Some(collision) = input.collision {
                    self.end_run(collision);
                }
            }
            RunState::Ended => {}
        }
    }

    /// Start a new run after a collision. Does nothing unless the run has ended.
    pub fn restart(&mut self) -> bool {
        if self.state != RunState::Ended {
            log::debug!("Restart ignored in state {:?}", self.state);
            return false;
        }

        self.physics_paused = false;
        self.animations_paused = false;
        self.player.vel.y = 0.0;
        self.obstacles.clear();
        self.game_over_visible = false;
        self.score.begin_run();

        self.state = RunState::Running;

        self.events.extend([
            GameEvent::ResumePhysics,
            GameEvent::ResumeAnimations,
            GameEvent::Animation(AnimationCue::Run),
            GameEvent::Restarted,
        ]);
        log::info!("Run restarted (high score {})", self.score.high_score());
        true
    }

    fn begin_ramp(&mut self) {
        self.start_trigger.disable();
        let ramp = Ramp::new(self.ground_width, self.viewport.width, self.ramp_config.increment);
        log::info!(
            "Start trigger touched, ramping in over {} ticks",
            Ramp::ticks_to_complete(ramp.progress(), ramp.target(), self.ramp_config.increment)
        );
        self.ramp = Some(ramp);
        self.state = RunState::Starting;
        self.player.vel.x = self.ramp_config.player_velocity;
        self.events.extend([GameEvent::Animation(AnimationCue::Run), GameEvent::RampStarted]);
    }

    fn advance_ramp(&mut self) {
        let Some(ramp) = self.ramp.as_mut() else {
            return;
        };
        let done = ramp.step();
        self.ground_width = ramp.progress();
        if !done {
            return;
        }

        self.ramp = None;
        self.ground_width = self.viewport.width;
        self.player.vel.x = 0.0;
        self.decorations_visible = true;
        self.score_visible = true;
        self.score.begin_run();
        self.state = RunState::Running;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run started");
    }

    fn advance_run(&mut self, delta: f64) {
        if let Some(obstacle) = self.spawner.try_spawn(delta, &mut self.rng) {
            self.events.push(GameEvent::ObstacleSpawned { id: obstacle.id });
            self.obstacles.push(obstacle);
        }

        let tick = self.score.tick(delta);
        for score in tick.milestones {
            let speed_modifier = self.scroll.on_milestone();
            log::debug!("Milestone {} reached, speed x{:.1}", score, speed_modifier);
            self.events.push(GameEvent::MilestoneReached {
                score,
                speed_modifier,
            });
        }

        self.scroll
            .advance(&mut self.obstacles, &mut self.decorations, &mut self.rng);

        self.obstacles.retain(|o| !o.is_off_screen());
    }

    fn end_run(&mut self, collision: CollisionEvent) {
        self.state = RunState::Ended;
        self.physics_paused = true;
        self.animations_paused = true;

        let result = self.score.finish_run();
        self.spawner.reset();
        self.scroll.reset();

        self.high_score_visible = true;
        self.game_over_visible = true;

        self.events.extend([
            GameEvent::PausePhysics,
            GameEvent::PauseAnimations,
            GameEvent::Animation(AnimationCue::Death),
            GameEvent::GameOver {
                score: result.score,
                high_score: result.high_score,
                new_high_score: result.new_high_score,
            },
        ]);
        log::info!(
            "Game over: hit obstacle {}, score {} (high score {}{})",
            collision.obstacle_id,
            result.score,
            result.high_score,
            if result.new_high_score { ", new record" } else { "" }
        );
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Only `Running` advances the simulation
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.state == RunState::Ended
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn high_score(&self) -> u32 {
        self.score.high_score()
    }

    pub fn score_text(&self) -> String {
        self.score.score_text()
    }

    pub fn high_score_text(&self) -> String {
        self.score.high_score_text()
    }

    pub fn speed_modifier(&self) -> f32 {
        self.scroll.speed_modifier()
    }

    pub fn effective_speed(&self) -> f32 {
        self.scroll.effective_speed()
    }

    pub fn ground_offset(&self) -> f32 {
        self.scroll.ground_offset()
    }

    pub fn time_since_last_spawn(&self) -> f64 {
        self.spawner.time_since_last_spawn()
    }

    pub fn score_pending_time(&self) -> f64 {
        self.score.pending_time()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    /// Host physics writes the integrated player position back through here
    pub fn player_mut(&mut self) -> &mut PlayerBody {
        &mut self.player
    }

    pub fn start_trigger(&self) -> &StartTrigger {
        &self.start_trigger
    }

    pub fn ground_width(&self) -> f32 {
        self.ground_width
    }

    pub fn ramp(&self) -> Option<&Ramp> {
        self.ramp.as_ref()
    }

    pub fn physics_paused(&self) -> bool {
        self.physics_paused
    }

    pub fn animations_paused(&self) -> bool {
        self.animations_paused
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score_text(),
            high_score: self.high_score_text(),
            is_running: self.is_running(),
            is_game_over: self.is_game_over(),
            score_visible: self.score_visible,
            high_score_visible: self.high_score_visible,
            decorations_visible: self.decorations_visible,
        }
    }

    #[cfg(test)]
    fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}

/// Three clouds spread across the upper sky
fn default_decorations(viewport: ViewportConfig) -> Vec<Decoration> {
    let w = viewport.width;
    [(w / 2.0, 170.0), (w - 80.0, 80.0), (w / 1.3, 100.0)]
        .into_iter()
        .map(|(x, y)| Decoration {
            pos: Vec2::new(x, y),
            width: CLOUD_WIDTH,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    const FRAME_MS: f64 = 16.0;

    fn machine(seed: u64) -> RunStateMachine {
        RunStateMachine::new(&RunConfig::with_seed(seed)).unwrap()
    }

    /// Touch the start trigger and play the ramp through
    fn running_machine(seed: u64) -> RunStateMachine {
        let mut m = machine(seed);
        m.update(FRAME_MS, &FrameInput::start());
        while m.state() == RunState::Starting {
            m.update(FRAME_MS, &FrameInput::default());
        }
        assert_eq!(m.state(), RunState::Running);
        m.drain_events();
        m
    }

    fn idle_frames(m: &mut RunStateMachine, frames: usize) {
        for _ in 0..frames {
            m.update(FRAME_MS, &FrameInput::default());
        }
    }

    #[test]
    fn test_idle_until_start_trigger() {
        let mut m = machine(1);
        idle_frames(&mut m, 100);
        assert_eq!(m.state(), RunState::Idle);
        assert!(!m.is_running());
        assert_eq!(m.score(), 0);
        assert!(m.obstacles().is_empty());
    }

    #[test]
    fn test_idle_cue_on_construction() {
        let mut m = machine(1);
        assert_eq!(m.drain_events(), vec![GameEvent::Animation(AnimationCue::Idle)]);
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn test_start_trigger_begins_ramp() {
        let mut m = machine(1);
        m.drain_events();
        m.update(FRAME_MS, &FrameInput::start());

        assert_eq!(m.state(), RunState::Starting);
        assert!(!m.start_trigger().active);
        assert_eq!(m.player().vel.x, 80.0);
        assert_eq!(
            m.drain_events(),
            vec![GameEvent::Animation(AnimationCue::Run), GameEvent::RampStarted]
        );

        // Overlap reports during the ramp are ignored
        m.update(FRAME_MS, &FrameInput::start());
        assert_eq!(m.state(), RunState::Starting);
    }

    #[test]
    fn test_ramp_completes_into_running() {
        let mut m = machine(1);
        m.update(FRAME_MS, &FrameInput::start());

        let expected = Ramp::ticks_to_complete(88.0, 1000.0, 30.0);
        for _ in 0..expected - 1 {
            m.update(FRAME_MS, &FrameInput::default());
            assert_eq!(m.state(), RunState::Starting);
            assert!(!m.is_running());
        }
        assert_eq!(m.score(), 0);

        m.update(FRAME_MS, &FrameInput::default());
        assert_eq!(m.state(), RunState::Running);
        assert!(m.is_running());
        assert_eq!(m.ground_width(), 1000.0);
        assert_eq!(m.player().vel.x, 0.0);
        assert!(m.ramp().is_none());

        let hud = m.hud();
        assert!(hud.score_visible && hud.decorations_visible);
        assert!(!hud.high_score_visible && !hud.is_game_over);
        assert!(m.drain_events().contains(&GameEvent::RunStarted));
    }

    #[test]
    fn test_spawn_scenario_keeps_remainder() {
        let mut m = running_machine(2);
        idle_frames(&mut m, 94);
        let spawned = m
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        assert_eq!(m.time_since_last_spawn(), 4.0);
        assert_eq!(m.obstacles().len(), 1);
    }

    #[test]
    fn test_score_and_speed_ramp() {
        let mut m = running_machine(3);
        // 99 points, then one frame worth two more crosses 100 once
        m.update(9_900.0, &FrameInput::default());
        assert_eq!(m.score(), 99);
        assert_eq!(m.speed_modifier(), 1.0);

        m.update(200.0, &FrameInput::default());
        assert_eq!(m.score(), 101);
        assert!((m.speed_modifier() - 1.2).abs() < 1e-5);

        let milestones: Vec<_> = m
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MilestoneReached { .. }))
            .collect();
        assert_eq!(milestones.len(), 1);

        idle_frames(&mut m, 10);
        assert!((m.speed_modifier() - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_offscreen_obstacles_are_retired() {
        let mut m = running_machine(4);
        for _ in 0..2_000 {
            m.update(FRAME_MS, &FrameInput::default());
            assert!(m.obstacles().iter().all(|o| o.right_edge() >= 0.0));
        }
        assert!(m.obstacles().len() < 10);
    }

    #[test]
    fn test_manual_obstacle_scrolls_out() {
        let mut m = running_machine(5);
        m.push_obstacle(Obstacle {
            id: 999,
            kind: ObstacleKind::Ground { variant: 1 },
            pos: Vec2::new(1.0, 340.0),
            width: 5.0,
            immovable: true,
        });
        m.update(1.0, &FrameInput::default());
        assert!(m.obstacles().iter().all(|o| o.id != 999));
    }

    #[test]
    fn test_collision_ends_run_and_resets_counters() {
        let mut m = running_machine(6);
        m.update(15_000.0, &FrameInput::default());
        m.update(30.0, &FrameInput::default());
        assert_eq!(m.score(), 150);
        assert!(m.speed_modifier() > 1.0);
        m.drain_events();

        m.update(FRAME_MS, &FrameInput::collision(1));

        assert_eq!(m.state(), RunState::Ended);
        assert!(!m.is_running());
        assert!(m.is_game_over());
        assert_eq!(m.high_score(), 150);
        assert_eq!(m.score(), 0);
        assert_eq!(m.time_since_last_spawn(), 0.0);
        assert_eq!(m.score_pending_time(), 0.0);
        assert_eq!(m.speed_modifier(), 1.0);
        assert!(m.physics_paused() && m.animations_paused());

        // The finished score stays on screen
        let hud = m.hud();
        assert_eq!(hud.score, "00150");
        assert_eq!(hud.high_score, "HI 00150");
        assert!(hud.high_score_visible);

        let events = m.drain_events();
        assert!(events.contains(&GameEvent::Animation(AnimationCue::Death)));
        assert!(events.contains(&GameEvent::GameOver {
            score: 150,
            high_score: 150,
            new_high_score: true,
        }));
    }

    #[test]
    fn test_collision_while_ended_is_ignored() {
        let mut m = running_machine(7);
        m.update(5_000.0, &FrameInput::default());
        m.update(FRAME_MS, &FrameInput::collision(1));
        m.drain_events();

        m.update(FRAME_MS, &FrameInput::collision(2));
        assert!(m.drain_events().is_empty());
        assert_eq!(m.high_score(), 50);
    }

    #[test]
    fn test_frozen_while_ended() {
        let mut m = running_machine(8);
        idle_frames(&mut m, 200);
        m.update(FRAME_MS, &FrameInput::collision(1));
        let positions: Vec<_> = m.obstacles().iter().map(|o| o.pos).collect();

        idle_frames(&mut m, 50);
        let after: Vec<_> = m.obstacles().iter().map(|o| o.pos).collect();
        assert_eq!(positions, after);
        assert_eq!(m.score(), 0);
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut m = running_machine(9);
        idle_frames(&mut m, 200);
        m.player_mut().vel.y = -300.0;
        m.update(FRAME_MS, &FrameInput::collision(1));
        assert!(!m.obstacles().is_empty());
        m.drain_events();

        assert!(m.restart());
        assert_eq!(m.state(), RunState::Running);
        assert!(m.is_running());
        assert!(m.obstacles().is_empty());
        assert!(!m.hud().is_game_over);
        assert_eq!(m.player().vel.y, 0.0);
        assert_eq!(m.score_text(), "00000");
        assert!(m.drain_events().contains(&GameEvent::Restarted));

        assert!(!m.restart());
        assert!(m.drain_events().is_empty());
        assert_eq!(m.state(), RunState::Running);
        assert!(m.is_running());
    }

    #[test]
    fn test_restart_before_end_is_noop() {
        let mut m = machine(10);
        assert!(!m.restart());
        assert_eq!(m.state(), RunState::Idle);

        let mut m = running_machine(10);
        assert!(!m.restart());
        assert_eq!(m.state(), RunState::Running);
    }

    #[test]
    fn test_high_score_survives_restart() {
        let mut m = running_machine(11);
        m.update(8_000.0, &FrameInput::default());
        m.update(FRAME_MS, &FrameInput::collision(1));
        assert_eq!(m.high_score(), 80);

        m.restart();
        assert_eq!(m.high_score(), 80);
        m.update(3_000.0, &FrameInput::default());
        m.update(FRAME_MS, &FrameInput::collision(1));
        assert_eq!(m.high_score(), 80);

        m.restart();
        m.update(12_000.0, &FrameInput::default());
        m.update(FRAME_MS, &FrameInput::collision(1));
        assert_eq!(m.high_score(), 120);
    }

    #[test]
    fn test_start_trigger_only_once_per_process() {
        let mut m = running_machine(12);
        m.update(FRAME_MS, &FrameInput::collision(1));
        m.restart();
        m.update(FRAME_MS, &FrameInput::start());
        assert_eq!(m.state(), RunState::Running);
        assert!(m.ramp().is_none());
    }

    #[test]
    fn test_determinism() {
        let mut a = running_machine(12345);
        let mut b = running_machine(12345);
        idle_frames(&mut a, 500);
        idle_frames(&mut b, 500);
        assert_eq!(a.obstacles(), b.obstacles());
        assert_eq!(a.decorations(), b.decorations());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn test_with_components_validates_config() {
        let valid = RunConfig::default();
        let spawner = ObstacleSpawner::from_config(&valid).unwrap();
        let scroll = ScrollModel::from_config(&valid).unwrap();
        let score = ScoreTracker::from_config(&valid).unwrap();

        let mut stalled = valid.clone();
        stalled.ramp.increment = 0.0;
        assert!(matches!(
            RunStateMachine::with_components(&stalled, spawner.clone(), scroll.clone(), score.clone()),
            Err(ConfigError::NonPositive {
                field: "ramp.increment",
                ..
            })
        ));

        let mut m = RunStateMachine::with_components(&valid, spawner, scroll, score).unwrap();
        m.update(FRAME_MS, &FrameInput::start());
        idle_frames(&mut m, 100);
        assert_eq!(m.state(), RunState::Running);
    }

    #[test]
    fn test_backward_clouds_refuse_to_start() {
        let mut config = RunConfig::default();
        config.decoration_speed = -0.5;
        assert!(RunStateMachine::new(&config).is_err());
    }

    #[test]
    fn test_invalid_config_refuses_to_start() {
        let mut config = RunConfig::default();
        config.spawn_interval_ms = 0.0;
        assert!(RunStateMachine::new(&config).is_err());

        let mut config = RunConfig::default();
        config.obstacles.ground_widths.clear();
        config.obstacles.flying_widths.clear();
        assert!(matches!(
            RunStateMachine::new(&config),
            Err(ConfigError::NoObstacleKinds)
        ));
    }
}
