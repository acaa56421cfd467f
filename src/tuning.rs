//! Game tuning and balance
//!
//! Every constant the session reads at runtime lives here so a host can
//! override it from a JSON file. Missing fields fall back to `consts`.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub gravity: f32,
    pub flap_impulse: f32,

    // === Obstacles ===
    /// Gap between paired obstacles, in player heights
    pub gap_factor: f32,
    pub obstacle_width: f32,
    pub gate_width: f32,
    /// Seconds between spawn cycles
    pub spawn_period: f32,
    /// Keep the spawn timer firing after game over (reference behavior)
    pub spawn_while_over: bool,

    // === Scenery ===
    pub scenery_tiles: u32,
    pub scenery_scroll_duration: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            gap_factor: GAP_FACTOR,
            obstacle_width: OBSTACLE_WIDTH,
            gate_width: GATE_WIDTH,
            spawn_period: SPAWN_PERIOD,
            spawn_while_over: true,

            scenery_tiles: SCENERY_TILES,
            scenery_scroll_duration: SCENERY_SCROLL_DURATION,
        }
    }
}

impl GameTuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json).context("malformed tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)
            .with_context(|| format!("loading tuning file {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the spawner and physics cannot work with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.field_width > 0.0 && self.field_height > 0.0,
            "field must have positive size, got {}x{}",
            self.field_width,
            self.field_height
        );
        ensure!(
            self.player_width > 0.0 && self.player_height > 0.0,
            "player must have positive size"
        );
        ensure!(self.spawn_period > 0.0, "spawn_period must be positive");
        ensure!(self.gap_factor > 0.0, "gap_factor must be positive");
        ensure!(
            self.gap_height() < self.field_height / 2.0,
            "gap of {} does not fit in half the field height",
            self.gap_height()
        );
        ensure!(
            self.obstacle_width > 0.0 && self.gate_width > 0.0,
            "obstacle and gate widths must be positive"
        );
        ensure!(
            self.scenery_scroll_duration > 0.0,
            "scenery_scroll_duration must be positive"
        );
        Ok(())
    }

    #[inline]
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    #[inline]
    pub fn field_center(&self) -> Vec2 {
        self.field_size() * 0.5
    }

    #[inline]
    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    /// Vertical opening between an obstacle pair
    #[inline]
    pub fn gap_height(&self) -> f32 {
        self.player_height * self.gap_factor
    }

    /// Time an obstacle takes to cross its full travel distance
    #[inline]
    pub fn obstacle_travel_duration(&self) -> f32 {
        self.field_width / OBSTACLE_DURATION_DIVISOR
    }

    /// Horizontal distance covered by each spawned body
    #[inline]
    pub fn obstacle_travel_distance(&self) -> f32 {
        self.field_width * OBSTACLE_TRAVEL_WIDTHS
    }

    /// Leftward speed, independent of field width
    pub fn obstacle_speed(&self) -> f32 {
        self.obstacle_travel_distance() / self.obstacle_travel_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GameTuning::default().validate().is_ok());
    }

    #[test]
    fn test_obstacle_speed_independent_of_width() {
        let narrow = GameTuning {
            field_width: 320.0,
            ..Default::default()
        };
        let wide = GameTuning {
            field_width: 1280.0,
            ..Default::default()
        };
        assert!((narrow.obstacle_speed() - 200.0).abs() < 1e-3);
        assert!((wide.obstacle_speed() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = GameTuning::from_json(r#"{ "spawn_period": 1.5 }"#).unwrap();
        assert_eq!(tuning.spawn_period, 1.5);
        assert_eq!(tuning.field_width, FIELD_WIDTH);
        assert!(tuning.spawn_while_over);
    }

    #[test]
    fn test_rejects_oversized_gap() {
        let err = GameTuning::from_json(r#"{ "gap_factor": 40.0 }"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(GameTuning::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = GameTuning {
            spawn_while_over: false,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(GameTuning::from_json(&json).unwrap(), tuning);
    }
}
