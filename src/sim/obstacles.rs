//! Obstacle pair generation
//!
//! A spawn cycle produces an upper obstacle, a lower obstacle and a thin
//! scoring gate filling the opening between them. The opening is centered on
//! `field_mid_y + offset`, where `offset = r - field_height / 4` for a uniform
//! integer `r` in `[0, field_height / 2)`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GameTuning;

/// Box placement (center + full size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxLayout {
    pub center: Vec2,
    pub size: Vec2,
}

impl BoxLayout {
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }
}

/// Geometry of one spawn cycle, before anything is added to the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnLayout {
    pub vertical_offset: f32,
    pub upper: BoxLayout,
    pub lower: BoxLayout,
    pub gate: BoxLayout,
}

impl SpawnLayout {
    /// Draw a random offset and lay out the pair
    pub fn generate<R: Rng + ?Sized>(tuning: &GameTuning, rng: &mut R) -> Self {
        let spread = ((tuning.field_height / 2.0) as u32).max(1);
        let r = rng.random_range(0..spread);
        let offset = r as f32 - tuning.field_height / 4.0;
        Self::with_offset(tuning, offset)
    }

    /// Lay out a pair whose opening is `offset` above the field's middle
    pub fn with_offset(tuning: &GameTuning, offset: f32) -> Self {
        let mid = tuning.field_center();
        let gap = tuning.gap_height();
        let gap_center = Vec2::new(mid.x + tuning.field_width, mid.y + offset);

        // Each half is a full field tall so no offset can expose its far end
        let obstacle_size = Vec2::new(tuning.obstacle_width, tuning.field_height);
        let reach = gap / 2.0 + obstacle_size.y / 2.0;

        Self {
            vertical_offset: offset,
            upper: BoxLayout {
                center: gap_center + Vec2::new(0.0, reach),
                size: obstacle_size,
            },
            lower: BoxLayout {
                center: gap_center - Vec2::new(0.0, reach),
                size: obstacle_size,
            },
            gate: BoxLayout {
                center: gap_center,
                size: Vec2::new(tuning.gate_width, gap),
            },
        }
    }

    /// Midpoint between the obstacles' facing edges
    pub fn gap_midpoint(&self) -> f32 {
        (self.upper.bottom() + self.lower.top()) / 2.0
    }
}

/// Scripted motion attached to a moving object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveAction {
    /// Translate by `offset` over `duration`, then remove the object
    Once { offset: Vec2, duration: f32 },
    /// Translate by `offset` over `duration`, snap back, forever
    Loop { offset: Vec2, duration: f32 },
}

impl MoveAction {
    /// The one-shot action every spawned body runs
    pub fn obstacle_pass(tuning: &GameTuning) -> Self {
        MoveAction::Once {
            offset: Vec2::new(-tuning.obstacle_travel_distance(), 0.0),
            duration: tuning.obstacle_travel_duration(),
        }
    }

    /// Background tiles shift left one field width per cycle
    pub fn scenery_scroll(tuning: &GameTuning) -> Self {
        MoveAction::Loop {
            offset: Vec2::new(-tuning.field_width, 0.0),
            duration: tuning.scenery_scroll_duration,
        }
    }

    /// Offset from the starting position after `elapsed` time
    pub fn displacement_at(&self, elapsed: f32) -> Vec2 {
        match *self {
            MoveAction::Once { offset, duration } => offset * (elapsed / duration).clamp(0.0, 1.0),
            MoveAction::Loop { offset, duration } => offset * (elapsed / duration).fract(),
        }
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        match *self {
            MoveAction::Once { duration, .. } => elapsed >= duration,
            MoveAction::Loop { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_zero_offset_layout() {
        let tuning = GameTuning::default();
        let layout = SpawnLayout::with_offset(&tuning, 0.0);
        let mid = tuning.field_center();
        let gap = tuning.gap_height();

        assert_eq!(layout.gate.center, Vec2::new(mid.x + tuning.field_width, mid.y));
        assert!((layout.upper.bottom() - (mid.y + gap / 2.0)).abs() < 1e-3);
        assert!((layout.lower.top() - (mid.y - gap / 2.0)).abs() < 1e-3);
        assert_eq!(layout.upper.center.x, layout.gate.center.x);
        assert_eq!(layout.lower.center.x, layout.gate.center.x);
        assert_eq!(layout.gate.size, Vec2::new(tuning.gate_width, gap));
    }

    #[test]
    fn test_gap_is_four_player_heights() {
        let tuning = GameTuning::default();
        let layout = SpawnLayout::with_offset(&tuning, 37.0);
        let opening = layout.upper.bottom() - layout.lower.top();
        assert!((opening - tuning.player_height * 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_obstacles_cover_field_edges() {
        let tuning = GameTuning::default();
        for offset in [-tuning.field_height / 4.0, tuning.field_height / 4.0 - 1.0] {
            let layout = SpawnLayout::with_offset(&tuning, offset);
            assert!(layout.upper.top() >= tuning.field_height);
            assert!(layout.lower.bottom() <= 0.0);
        }
    }

    #[test]
    fn test_pass_action() {
        let tuning = GameTuning::default();
        let action = MoveAction::obstacle_pass(&tuning);
        let duration = tuning.field_width / 100.0;

        assert_eq!(action.displacement_at(0.0), Vec2::ZERO);
        let halfway = action.displacement_at(duration / 2.0);
        assert!((halfway.x + tuning.field_width).abs() < 1e-3);
        assert!(!action.is_finished(duration * 0.99));
        assert!(action.is_finished(duration));
        // Clamped after the end
        let end = action.displacement_at(duration * 3.0);
        assert!((end.x + 2.0 * tuning.field_width).abs() < 1e-3);
    }

    #[test]
    fn test_scenery_loops() {
        let tuning = GameTuning::default();
        let action = MoveAction::scenery_scroll(&tuning);
        let d = tuning.scenery_scroll_duration;
        assert!(!action.is_finished(d * 100.0));
        let a = action.displacement_at(d * 0.25);
        let b = action.displacement_at(d * 1.25);
        assert!((a - b).length() < 1e-2);
    }

    proptest! {
        #[test]
        fn prop_gate_centered_in_gap(seed in any::<u64>()) {
            let tuning = GameTuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = SpawnLayout::generate(&tuning, &mut rng);

            prop_assert!((layout.gate.center.y - layout.gap_midpoint()).abs() < 1e-3);
            // Gate sits in the opening without overlapping either half
            prop_assert!(layout.gate.top() <= layout.upper.bottom() + 1e-3);
            prop_assert!(layout.gate.bottom() >= layout.lower.top() - 1e-3);
        }

        #[test]
        fn prop_offset_range(seed in any::<u64>()) {
            let tuning = GameTuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = SpawnLayout::generate(&tuning, &mut rng);
            let quarter = tuning.field_height / 4.0;

            prop_assert!(layout.vertical_offset >= -quarter);
            prop_assert!(layout.vertical_offset < quarter);
            prop_assert_eq!(layout.vertical_offset.fract(), 0.0);
        }
    }
}
