//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by body and node ID)
//! - No rendering or platform dependencies

pub mod category;
pub mod collision;
pub mod contact;
pub mod game;
pub mod obstacles;
pub mod physics;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use category::{Category, CategoryMasks};
pub use collision::{CollisionResult, box_box_collision};
pub use contact::{ContactOutcome, classify};
pub use game::Game;
pub use obstacles::{BoxLayout, MoveAction, SpawnLayout};
pub use physics::{ArcadePhysics, BodyDesc, BodyId, Contact, PhysicsWorld};
pub use scene::{Node, NodeId, NodeKind, Scene};
pub use scheduler::{SpawnScheduler, TimerHandle};
pub use state::{GameEvent, GamePhase, MovingObject, Player, RngState, Session};
pub use tick::{TickInput, tick};
