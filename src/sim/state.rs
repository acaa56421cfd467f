//! Session state and core simulation types
//!
//! Everything a restart has to wipe lives in `Session`. The player and the
//! ground outlive restarts and are held by the `Game` controller instead.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacles::MoveAction;
use super::physics::BodyId;
use super::scene::{NodeId, NodeKind};
use super::scheduler::{SpawnScheduler, TimerHandle};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay, world simulating
    Playing,
    /// Run ended, world frozen until the next activation
    GameOver,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// One obstacle pair and gate entered the field
    Spawned { vertical_offset: f32 },
    Flapped,
    Scored { score: u32 },
    /// Lethal contact reported, whether or not it ended the run
    Collided,
    GameOver { score: u32 },
    Restarted,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Something that scrolls with the field: obstacle halves, gates, scenery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingObject {
    pub node: NodeId,
    /// Scenery has no body
    pub body: Option<BodyId>,
    pub kind: NodeKind,
    /// Position when the action started
    pub origin: Vec2,
    pub action: MoveAction,
    /// Simulation time spent running the action
    pub elapsed: f32,
}

impl MovingObject {
    pub fn new(node: NodeId, body: Option<BodyId>, kind: NodeKind, origin: Vec2, action: MoveAction) -> Self {
        Self {
            node,
            body,
            kind,
            origin,
            action,
            elapsed: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.origin + self.action.displacement_at(self.elapsed)
    }

    /// Run the action for `dt`; returns false once the object should go away
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        !self.action.is_finished(self.elapsed)
    }
}

/// The singleton player body
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub body: BodyId,
    pub node: NodeId,
}

/// Score, phase, spawn timer, and every object a restart clears
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: u32,
    pub phase: GamePhase,
    /// 1.0 while playing, 0.0 while over
    pub sim_speed: f32,
    pub scheduler: SpawnScheduler,
    pub spawn_timer: Option<TimerHandle>,
    /// Obstacles, gates and scenery; cleared as a unit on restart
    pub moving: Vec<MovingObject>,
    /// Terminal display, present only while over
    pub game_over_label: Option<NodeId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            phase: GamePhase::Playing,
            sim_speed: 1.0,
            scheduler: SpawnScheduler::new(),
            spawn_timer: None,
            moving: Vec::new(),
            game_over_label: None,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Number of live moving objects of one kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.moving.iter().filter(|m| m.kind == kind).count()
    }
}
