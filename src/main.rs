//! Dino Run headless entry point
//!
//! Drives the simulation with a fixed frame delta and a stand-in physics host
//! that never jumps, so every run ends at the first low obstacle. Prints the
//! HUD as JSON at each game over, restarts once, then exits.
//!
//! Usage: `dino-run [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use dino_run::RunConfig;
    use dino_run::sim::{Altitude, FrameInput, GameEvent, Obstacle, ObstacleKind, RunStateMachine};

    /// ~60 Hz
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop a run that somehow never collides
    const MAX_FRAMES_PER_RUN: u32 = 60 * 60 * 5;
    const RUNS: u32 = 2;

    /// Player hitbox width from the left edge of the screen
    const PLAYER_WIDTH: f32 = 44.0;

    /// Stand-in for the physics collaborator: a grounded player touches
    /// anything that isn't flying high.
    fn touching(obstacle: &Obstacle) -> bool {
        let overlaps_x = obstacle.pos.x < PLAYER_WIDTH && obstacle.right_edge() > 0.0;
        let reachable = !matches!(
            obstacle.kind,
            ObstacleKind::Flying {
                altitude: Altitude::High,
                ..
            }
        );
        overlaps_x && reachable
    }

    pub fn run() -> Result<(), dino_run::ConfigError> {
        let config = match std::env::args().nth(1) {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::with_seed(0xD1_0000),
        };
        let mut sim = RunStateMachine::new(&config)?;
        log::info!("Simulation ready (seed {})", config.seed);

        // Player lands on the start trigger on the first frame
        sim.update(FRAME_MS, &FrameInput::start());

        for run in 1..=RUNS {
            let mut frames = 0;
            while !sim.is_game_over() && frames < MAX_FRAMES_PER_RUN {
                let input = FrameInput {
                    collision: sim
                        .obstacles()
                        .iter()
                        .find(|o| touching(o))
                        .map(|o| dino_run::sim::CollisionEvent { obstacle_id: o.id }),
                    ..Default::default()
                };
                sim.update(FRAME_MS, &input);
                frames += 1;

                for event in sim.drain_events() {
                    match event {
                        GameEvent::MilestoneReached { score, .. } => {
                            log::info!("Milestone {}", score)
                        }
                        other => log::debug!("{:?}", other),
                    }
                }
            }

            match serde_json::to_string(&sim.hud()) {
                Ok(json) => println!("run {}: {}", run, json),
                Err(e) => log::warn!("Could not serialize HUD: {}", e),
            }

            if run < RUNS {
                sim.restart();
            }
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dino Run (headless) starting...");

    if let Err(e) = host::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `RunStateMachine` directly on the web
}
