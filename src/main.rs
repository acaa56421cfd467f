//! Flap Gate headless host
//!
//! Runs a seeded session at the fixed timestep with a simple autopilot that
//! taps whenever the player drops below the next opening, restarting after
//! each crash, and logs what happened.
//!
//! Usage: `flap-gate [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use flap_gate::GameTuning;
    use flap_gate::consts::SIM_DT;
    use flap_gate::sim::{Game, GameEvent, GamePhase, TickInput, tick};

    /// Simulated seconds to play
    const RUN_SECONDS: f32 = 120.0;
    /// Pause on the game-over screen before tapping again
    const RESTART_DELAY_TICKS: u32 = 60;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("invalid seed {:?}", arg))?,
        None => 0x5eed,
    };
    let tuning = match args.next() {
        Some(path) => GameTuning::load(path)?,
        None => GameTuning::default(),
    };

    log::info!("Flap Gate (headless) starting...");
    let mut game = Game::with_tuning(seed, tuning);

    let mut best = 0;
    let mut runs = 1;
    let mut over_ticks = 0;
    let steps = (RUN_SECONDS / SIM_DT) as u32;

    for _ in 0..steps {
        let activate = match game.session.phase {
            GamePhase::Playing => {
                let player = game.player_position();
                let target = game.next_gate().map_or(game.tuning.field_center().y, |gate| gate.y);
                player.y < target - game.tuning.player_height && game.player_velocity().y <= 0.0
            }
            GamePhase::GameOver => {
                over_ticks += 1;
                over_ticks >= RESTART_DELAY_TICKS
            }
        };
        if activate && game.session.is_over() {
            over_ticks = 0;
        }

        tick(&mut game, &TickInput { activate }, SIM_DT);

        for event in game.drain_events() {
            match event {
                GameEvent::Scored { score } => log::debug!("Scored: {}", score),
                GameEvent::GameOver { score } => {
                    best = best.max(score);
                    println!("Run {} ended with score {}", runs, score);
                }
                GameEvent::Restarted => runs += 1,
                _ => {}
            }
        }
    }

    best = best.max(game.session.score);
    println!("Seed {}: {} runs, best score {}", seed, runs, best);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `flap_gate::sim::tick` directly
}
