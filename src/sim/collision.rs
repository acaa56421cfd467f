//! Collision detection and response for axis-aligned boxes
//!
//! Every body in the field is a box: the player, obstacle halves, gates and
//! the ground strip. Response is positional: push the dynamic box out along
//! the axis of least penetration and drop the velocity heading into the wall.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal pointing from the other box toward this one
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Offset that moves box `a` clear of box `b`
    pub fn separation(&self) -> Vec2 {
        self.normal * self.penetration
    }
}

/// Check collision between box `a` and box `b` (center + full size)
///
/// The normal is the axis of least penetration, oriented so that moving `a`
/// along it by `penetration` separates the boxes.
pub fn box_box_collision(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> CollisionResult {
    let delta = a_center - b_center;
    let reach = (a_size + b_size) * 0.5;
    let overlap = reach - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }

    if overlap.x < overlap.y {
        CollisionResult {
            hit: true,
            normal: Vec2::new(delta.x.signum(), 0.0),
            penetration: overlap.x,
        }
    } else {
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, delta.y.signum()),
            penetration: overlap.y,
        }
    }
}

/// Remove the velocity component driving into a surface
///
/// Velocity already leaving the surface is left untouched.
pub fn slide_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    let into = velocity.dot(normal);
    if into < 0.0 { velocity - normal * into } else { velocity }
}
