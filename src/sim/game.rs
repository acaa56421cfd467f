//! Game controller
//!
//! Owns the session, the physics world, the scene and the RNG, and runs the
//! Playing/GameOver state machine. Hosts feed it activations and frames via
//! `tick`; contacts reported by the physics world come back through
//! `resolve_contact`.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::category::Category;
use super::contact::ContactOutcome;
use super::obstacles::{BoxLayout, MoveAction, SpawnLayout};
use super::physics::{ArcadePhysics, BodyDesc, BodyId, Contact, PhysicsWorld};
use super::scene::{NodeId, NodeKind, Scene};
use super::state::{GameEvent, GamePhase, MovingObject, Player, RngState, Session};
use crate::GameTuning;
use crate::consts::GROUND_HEIGHT;

const GAME_OVER_TEXT: &str = "Game Over! Tap to play again.";

pub struct Game<P: PhysicsWorld = ArcadePhysics> {
    pub tuning: GameTuning,
    pub session: Session,
    pub physics: P,
    pub scene: Scene,
    pub player: Player,
    /// Floor strip; lethal like an obstacle, never cleared
    pub ground: BodyId,
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    score_label: NodeId,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Game<ArcadePhysics> {
    /// Start a session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, GameTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: GameTuning) -> Self {
        let physics = ArcadePhysics::new(tuning.gravity);
        Self::with_physics(seed, tuning, physics)
    }
}

impl<P: PhysicsWorld> Game<P> {
    /// Build the world and enter `Playing` with one pair already spawned
    pub fn with_physics(seed: u64, tuning: GameTuning, mut physics: P) -> Self {
        let mut scene = Scene::new();
        let center = tuning.field_center();

        let ground = physics.create_body(BodyDesc::new(
            Category::Obstacle,
            Vec2::new(center.x, GROUND_HEIGHT / 2.0),
            Vec2::new(tuning.field_width, GROUND_HEIGHT),
        ));
        scene.add_child(NodeKind::Ground, Some(ground));

        let body = physics.create_body(BodyDesc::new(Category::Player, center, tuning.player_size()).dynamic());
        let node = scene.add_child(NodeKind::Player, Some(body));
        let score_label = scene.add_label(NodeKind::ScoreLabel, "0");

        let rng_state = RngState::new(seed);
        let mut game = Self {
            rng: rng_state.to_rng(),
            rng_state,
            tuning,
            session: Session::new(),
            physics,
            scene,
            player: Player { body, node },
            ground,
            time_ticks: 0,
            score_label,
            events: Vec::new(),
        };

        game.spawn_scenery();
        game.spawn_pair();
        game.start_spawning();
        log::info!("Game initialized with seed: {}", seed);
        game
    }

    /// Tap: flap while playing, restart while over
    pub fn activate(&mut self) {
        match self.session.phase {
            GamePhase::Playing => self.flap(),
            GamePhase::GameOver => self.restart(),
        }
    }

    fn flap(&mut self) {
        let body = self.player.body;
        debug_assert!(self.physics.velocity(body).is_some(), "player body missing from physics world");
        let velocity = self.physics.velocity(body).unwrap_or(Vec2::ZERO);
        self.physics.set_velocity(body, Vec2::new(velocity.x, 0.0));
        self.physics.apply_impulse(body, Vec2::new(0.0, self.tuning.flap_impulse));
        self.events.push(GameEvent::Flapped);
    }

    /// Route one contact-begin to the score or collision path
    pub fn resolve_contact(&mut self, contact: &Contact) {
        log::debug!(
            "Contact {:?}/{:?} ({:?} x {:?})",
            contact.body_a,
            contact.body_b,
            contact.category_a,
            contact.category_b
        );
        match ContactOutcome::from(contact) {
            ContactOutcome::Score => self.on_score_contact(),
            ContactOutcome::Collision => self.on_collision_contact(),
        }
    }

    /// +1, without looking at the phase
    pub fn on_score_contact(&mut self) {
        self.session.score += 1;
        let score = self.session.score;
        self.scene.set_text(self.score_label, score.to_string());
        self.events.push(GameEvent::Scored { score });
        log::debug!("Score: {}", score);
    }

    pub fn on_collision_contact(&mut self) {
        self.events.push(GameEvent::Collided);
        self.stop_game();
    }

    /// Freeze the world and show the terminal display; no-op if already over
    pub fn stop_game(&mut self) {
        if self.session.is_over() {
            return;
        }
        self.session.phase = GamePhase::GameOver;
        self.session.sim_speed = 0.0;

        if !self.tuning.spawn_while_over {
            if let Some(handle) = self.session.spawn_timer.take() {
                self.session.scheduler.cancel(handle);
            }
        }

        let label = self.scene.add_label(NodeKind::GameOverLabel, GAME_OVER_TEXT);
        self.session.game_over_label = Some(label);

        let score = self.session.score;
        self.events.push(GameEvent::GameOver { score });
        log::info!("Game over with score {}", score);
    }

    fn restart(&mut self) {
        self.session.score = 0;
        self.scene.set_text(self.score_label, "0");

        let center = self.tuning.field_center();
        self.physics.set_position(self.player.body, center);
        self.physics.set_velocity(self.player.body, Vec2::ZERO);

        self.clear_moving_objects();
        self.spawn_scenery();
        self.spawn_pair();
        self.start_spawning();

        self.session.sim_speed = 1.0;
        self.session.phase = GamePhase::Playing;
        if let Some(label) = self.session.game_over_label.take() {
            self.scene.remove_child(label);
        }

        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    /// (Re)arm the spawn timer, replacing any running one
    fn start_spawning(&mut self) {
        let handle = self.session.scheduler.start(self.tuning.spawn_period);
        self.session.spawn_timer = Some(handle);
    }

    /// Remove every obstacle, gate and scenery tile from world and scene
    pub fn clear_moving_objects(&mut self) {
        for obj in self.session.moving.drain(..) {
            if let Some(body) = obj.body {
                self.physics.remove_body(body);
            }
            self.scene.remove_child(obj.node);
        }
    }

    /// One spawn cycle with a random opening
    pub fn spawn_pair(&mut self) -> SpawnLayout {
        let layout = SpawnLayout::generate(&self.tuning, &mut self.rng);
        self.add_layout(layout);
        layout
    }

    /// One spawn cycle with a chosen opening offset
    pub fn spawn_pair_with_offset(&mut self, vertical_offset: f32) -> SpawnLayout {
        let layout = SpawnLayout::with_offset(&self.tuning, vertical_offset);
        self.add_layout(layout);
        layout
    }

    fn add_layout(&mut self, layout: SpawnLayout) {
        self.add_mover(NodeKind::UpperObstacle, Category::Obstacle, layout.upper);
        self.add_mover(NodeKind::LowerObstacle, Category::Obstacle, layout.lower);
        self.add_mover(NodeKind::ScoreGate, Category::ScoreGate, layout.gate);
        self.events.push(GameEvent::Spawned {
            vertical_offset: layout.vertical_offset,
        });
        log::debug!("Spawned pair at offset {}", layout.vertical_offset);
    }

    fn add_mover(&mut self, kind: NodeKind, category: Category, placement: BoxLayout) {
        let body = self
            .physics
            .create_body(BodyDesc::new(category, placement.center, placement.size));
        let node = self.scene.add_child(kind, Some(body));
        let action = MoveAction::obstacle_pass(&self.tuning);
        self.session
            .moving
            .push(MovingObject::new(node, Some(body), kind, placement.center, action));
    }

    fn spawn_scenery(&mut self) {
        let tile_width = self.tuning.field_width;
        let y = self.tuning.field_center().y;
        for i in 0..self.tuning.scenery_tiles {
            let origin = Vec2::new(tile_width / 2.0 + tile_width * i as f32, y);
            let node = self.scene.add_child(NodeKind::Scenery, None);
            let action = MoveAction::scenery_scroll(&self.tuning);
            self.session
                .moving
                .push(MovingObject::new(node, None, NodeKind::Scenery, origin, action));
        }
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_position(&self) -> Vec2 {
        self.physics.position(self.player.body).unwrap_or(Vec2::ZERO)
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.physics.velocity(self.player.body).unwrap_or(Vec2::ZERO)
    }

    /// Opening of the nearest gate still ahead of the player, if any
    pub fn next_gate(&self) -> Option<Vec2> {
        let player_x = self.player_position().x;
        self.session
            .moving
            .iter()
            .filter(|m| m.kind == NodeKind::ScoreGate)
            .map(MovingObject::position)
            .filter(|p| p.x >= player_x)
            .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn score_text(&self) -> Option<&str> {
        self.scene.get(self.score_label).and_then(|n| n.text.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floating_tuning() -> GameTuning {
        GameTuning {
            gravity: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let game = Game::new(7);
        let tuning = GameTuning::default();

        assert_eq!(game.session.phase, GamePhase::Playing);
        assert_eq!(game.session.score, 0);
        assert_eq!(game.session.sim_speed, 1.0);
        assert_eq!(game.session.count(NodeKind::UpperObstacle), 1);
        assert_eq!(game.session.count(NodeKind::LowerObstacle), 1);
        assert_eq!(game.session.count(NodeKind::ScoreGate), 1);
        assert_eq!(game.session.count(NodeKind::Scenery), tuning.scenery_tiles as usize);
        assert_eq!(game.session.scheduler.active_count(), 1);
        assert_eq!(game.player_position(), tuning.field_center());
        // ground + player + pair + gate
        assert_eq!(game.physics.body_count(), 5);
    }

    #[test]
    fn test_flap_replaces_vertical_velocity() {
        let mut game = Game::new(1);
        game.physics.set_velocity(game.player.body, Vec2::new(0.0, -500.0));
        game.activate();
        assert_eq!(game.player_velocity(), Vec2::new(0.0, game.tuning.flap_impulse));

        // Flapping twice does not stack
        game.activate();
        assert_eq!(game.player_velocity(), Vec2::new(0.0, game.tuning.flap_impulse));
    }

    #[test]
    fn test_score_updates_label() {
        let mut game = Game::new(1);
        game.on_score_contact();
        game.on_score_contact();
        assert_eq!(game.session.score, 2);
        assert_eq!(game.score_text(), Some("2"));
    }

    #[test]
    fn test_score_from_either_side() {
        let mut game = Game::new(1);
        let gate = BodyId(99);
        game.resolve_contact(&Contact {
            body_a: game.player.body,
            body_b: gate,
            category_a: Category::Player,
            category_b: Category::ScoreGate,
        });
        game.resolve_contact(&Contact {
            body_a: gate,
            body_b: game.player.body,
            category_a: Category::ScoreGate,
            category_b: Category::Player,
        });
        assert_eq!(game.session.score, 2);
        assert_eq!(game.session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_stop_game_is_idempotent() {
        let mut game = Game::new(3);
        game.stop_game();
        let label = game.session.game_over_label;
        assert!(label.is_some());

        game.stop_game();
        assert!(game.session.is_over());
        assert_eq!(game.session.sim_speed, 0.0);
        assert_eq!(game.session.game_over_label, label);
        assert_eq!(game.scene.count(NodeKind::GameOverLabel), 1);

        let game_overs = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_score_then_collision_same_batch() {
        let mut game = Game::new(3);
        game.on_score_contact();
        game.on_collision_contact();
        // Score path ignores the phase
        game.on_score_contact();
        assert_eq!(game.session.score, 2);
        assert!(game.session.is_over());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = Game::with_tuning(11, floating_tuning());
        for _ in 0..4 {
            game.spawn_pair();
        }
        game.on_score_contact();
        game.physics.set_position(game.player.body, Vec2::new(10.0, 10.0));
        game.physics.set_velocity(game.player.body, Vec2::new(3.0, -40.0));
        game.stop_game();

        game.activate();

        let tuning = &game.tuning;
        assert_eq!(game.session.phase, GamePhase::Playing);
        assert_eq!(game.session.score, 0);
        assert_eq!(game.session.sim_speed, 1.0);
        assert_eq!(game.player_position(), tuning.field_center());
        assert_eq!(game.player_velocity(), Vec2::ZERO);
        assert_eq!(game.session.count(NodeKind::UpperObstacle), 1);
        assert_eq!(game.session.count(NodeKind::LowerObstacle), 1);
        assert_eq!(game.session.count(NodeKind::ScoreGate), 1);
        assert_eq!(game.session.count(NodeKind::Scenery), tuning.scenery_tiles as usize);
        assert_eq!(game.session.moving.len(), 3 + tuning.scenery_tiles as usize);
        assert!(game.session.game_over_label.is_none());
        assert_eq!(game.scene.count(NodeKind::GameOverLabel), 0);
        assert_eq!(game.scene.count(NodeKind::Scenery), tuning.scenery_tiles as usize);
        assert_eq!(game.score_text(), Some("0"));
        assert_eq!(game.session.scheduler.active_count(), 1);
        // Old obstacle bodies are gone from the physics world
        assert_eq!(game.physics.body_count(), 5);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut game = Game::new(5);
        game.on_score_contact();
        game.activate();
        // Still playing, the tap was a flap
        assert_eq!(game.session.score, 1);
        assert!(game.drain_events().contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_timer_cancelled_when_configured() {
        let tuning = GameTuning {
            spawn_while_over: false,
            ..Default::default()
        };
        let mut game = Game::with_tuning(5, tuning);
        game.stop_game();
        assert_eq!(game.session.scheduler.active_count(), 0);
        game.activate();
        assert_eq!(game.session.scheduler.active_count(), 1);
    }

    #[test]
    fn test_timer_kept_by_default() {
        let mut game = Game::new(5);
        game.stop_game();
        assert_eq!(game.session.scheduler.active_count(), 1);
    }

    #[test]
    fn test_next_gate() {
        let mut game = Game::with_tuning(2, floating_tuning());
        game.clear_moving_objects();
        assert!(game.next_gate().is_none());
        let layout = game.spawn_pair_with_offset(40.0);
        assert_eq!(game.next_gate(), Some(layout.gate.center));
    }
}
