//! Per-frame update
//!
//! Order within a frame: input, spawn timer, scripted motion, physics step,
//! contact resolution. The spawn timer runs on wall time; motion and physics
//! run on `dt * sim_speed` so they stop dead while the run is over.

use super::game::Game;
use super::physics::PhysicsWorld;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/key
    pub activate: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick<P: PhysicsWorld>(game: &mut Game<P>, input: &TickInput, dt: f32) {
    if input.activate {
        game.activate();
    }

    let fires = game.session.scheduler.advance(dt);
    for _ in 0..fires {
        game.spawn_pair();
    }

    let sim_dt = dt * game.session.sim_speed;
    advance_moving_objects(game, sim_dt);

    let mut contacts = Vec::new();
    game.physics.step(sim_dt, &mut |contact| contacts.push(contact));
    for contact in &contacts {
        game.resolve_contact(contact);
    }

    game.time_ticks += 1;
}

/// Run scripted motion and drop objects whose one-shot action has finished
fn advance_moving_objects<P: PhysicsWorld>(game: &mut Game<P>, sim_dt: f32) {
    if sim_dt <= 0.0 {
        return;
    }

    let mut finished = Vec::new();
    for (index, obj) in game.session.moving.iter_mut().enumerate() {
        let alive = obj.advance(sim_dt);
        if let Some(body) = obj.body {
            game.physics.set_position(body, obj.position());
        }
        if !alive {
            finished.push(index);
        }
    }

    for index in finished.into_iter().rev() {
        let obj = game.session.moving.remove(index);
        if let Some(body) = obj.body {
            game.physics.remove_body(body);
        }
        game.scene.remove_child(obj.node);
    }
}
