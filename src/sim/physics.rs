//! Physics engine adapter
//!
//! The session never integrates motion itself. It talks to a `PhysicsWorld`:
//! create and remove bodies, poke velocities, and receive contact-begin
//! callbacks from `step`. `ArcadePhysics` is the built-in implementation used
//! by the headless host and the tests.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryMasks};
use super::collision::{box_box_collision, slide_velocity};
use crate::rects_overlap;

/// Handle to a body owned by a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Everything needed to create a box body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub category: Category,
    pub masks: CategoryMasks,
    pub position: Vec2,
    pub size: Vec2,
    /// Dynamic bodies feel gravity and get pushed by blocking contacts
    pub dynamic: bool,
    pub mass: f32,
}

impl BodyDesc {
    /// Static body with masks taken from the category registry
    pub fn new(category: Category, position: Vec2, size: Vec2) -> Self {
        Self {
            category,
            masks: category.into(),
            position,
            size,
            dynamic: false,
            mass: 1.0,
        }
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}

/// Contact-begin notification for a pair of bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub category_a: Category,
    pub category_b: Category,
}

impl Contact {
    /// True if either side carries `category`
    pub fn involves(&self, category: Category) -> bool {
        self.category_a == category || self.category_b == category
    }
}

/// Black-box physics engine as seen by the game session
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId;
    /// Removing an unknown body is a no-op
    fn remove_body(&mut self, id: BodyId);
    fn position(&self, id: BodyId) -> Option<Vec2>;
    fn set_position(&mut self, id: BodyId, position: Vec2);
    fn velocity(&self, id: BodyId) -> Option<Vec2>;
    fn set_velocity(&mut self, id: BodyId, velocity: Vec2);
    fn apply_impulse(&mut self, id: BodyId, impulse: Vec2);
    /// Advance by `dt`, reporting each contact-begin in arrival order
    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(Contact));
    fn body_count(&self) -> usize;
}

/// Contacts stay "begun" until the boxes separate by more than this
const CONTACT_SLOP: f32 = 0.5;

#[derive(Debug, Clone)]
struct Body {
    desc: BodyDesc,
    velocity: Vec2,
}

/// Minimal box integrator with gravity and category-driven contacts
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    gravity: Vec2,
    /// Sorted by id for deterministic pair order
    bodies: BTreeMap<BodyId, Body>,
    /// Pairs currently in contact (lower id first)
    touching: BTreeSet<(BodyId, BodyId)>,
    next_id: u32,
}

impl ArcadePhysics {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: Vec2::new(0.0, gravity),
            bodies: BTreeMap::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&BodyDesc> {
        self.bodies.get(&id).map(|b| &b.desc)
    }

    fn integrate(&mut self, dt: f32) {
        for body in self.bodies.values_mut().filter(|b| b.desc.dynamic) {
            body.velocity += self.gravity * dt;
            body.desc.position += body.velocity * dt;
        }
    }

    /// Push `id` out of `other` if `other` blocks it
    fn resolve_blocking(&mut self, id: BodyId, other: &BodyDesc) {
        let Some(body) = self.bodies.get_mut(&id) else {
            return;
        };
        if !body.desc.dynamic || !body.desc.masks.blocked_by(&other.masks) {
            return;
        }
        let result = box_box_collision(body.desc.position, body.desc.size, other.position, other.size);
        if result.hit {
            body.desc.position += result.separation();
            body.velocity = slide_velocity(body.velocity, result.normal);
        }
    }
}

impl Default for ArcadePhysics {
    fn default() -> Self {
        Self::new(crate::consts::GRAVITY)
    }
}

impl PhysicsWorld for ArcadePhysics {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            Body {
                desc,
                velocity: Vec2::ZERO,
            },
        );
        id
    }

    fn remove_body(&mut self, id: BodyId) {
        if self.bodies.remove(&id).is_some() {
            self.touching.retain(|&(a, b)| a != id && b != id);
        }
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.desc.position)
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.desc.position = position;
        }
    }

    fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            if body.desc.dynamic && body.desc.mass > 0.0 {
                body.velocity += impulse / body.desc.mass;
            }
        }
    }

    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(Contact)) {
        // Frozen world: nothing moves, so nothing new can touch
        if dt <= 0.0 {
            return;
        }

        self.integrate(dt);

        let ids: Vec<BodyId> = self.bodies.keys().copied().collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let (Some(desc_a), Some(desc_b)) = (self.body(a).copied(), self.body(b).copied()) else {
                    continue;
                };

                let overlapping = rects_overlap(desc_a.position, desc_a.size, desc_b.position, desc_b.size);
                if overlapping && desc_a.masks.notifies_with(&desc_b.masks) && self.touching.insert((a, b)) {
                    on_contact(Contact {
                        body_a: a,
                        body_b: b,
                        category_a: desc_a.category,
                        category_b: desc_b.category,
                    });
                }

                if overlapping {
                    self.resolve_blocking(a, &desc_b);
                    self.resolve_blocking(b, &desc_a);
                } else {
                    let slop = Vec2::splat(CONTACT_SLOP);
                    let near = rects_overlap(desc_a.position, desc_a.size + slop, desc_b.position, desc_b.size + slop);
                    if !near {
                        self.touching.remove(&(a, b));
                    }
                }
            }
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
