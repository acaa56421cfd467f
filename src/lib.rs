//! Flap Gate - A side-scrolling tap-to-flap arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, contacts, session state machine)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::GameTuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one physics step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play field dimensions (origin bottom-left, y up)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 960.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 52.0;
    pub const PLAYER_HEIGHT: f32 = 36.0;

    /// Downward acceleration applied to dynamic bodies (units/s²)
    pub const GRAVITY: f32 = -980.0;
    /// Upward impulse per flap (player mass is 1)
    pub const FLAP_IMPULSE: f32 = 380.0;

    /// Gap height = player height * GAP_FACTOR
    pub const GAP_FACTOR: f32 = 4.0;
    pub const OBSTACLE_WIDTH: f32 = 104.0;
    /// Scoring gates are a thin sensor slice
    pub const GATE_WIDTH: f32 = 1.0;
    /// Obstacles cross this many field widths per spawn cycle
    pub const OBSTACLE_TRAVEL_WIDTHS: f32 = 2.0;
    /// Travel duration is field_width / this
    pub const OBSTACLE_DURATION_DIVISOR: f32 = 100.0;

    /// Seconds between obstacle spawns
    pub const SPAWN_PERIOD: f32 = 3.0;
    /// Maximum spawn fires per frame; older backlog is dropped
    pub const MAX_SPAWN_CATCHUP: u32 = 4;

    /// Background tiles and their scroll cycle
    pub const SCENERY_TILES: u32 = 3;
    pub const SCENERY_SCROLL_DURATION: f32 = 9.0;

    /// Ground strip along the bottom edge
    pub const GROUND_HEIGHT: f32 = 1.0;
}

/// Strict overlap test for two center/size rectangles (shared edges don't count)
#[inline]
pub fn rects_overlap(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    let delta = (a_center - b_center).abs();
    let reach = (a_size + b_size) * 0.5;
    delta.x < reach.x && delta.y < reach.y
}
