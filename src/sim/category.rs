//! Physics categories
//!
//! Every body carries exactly one category bit. The contact mask says which
//! categories raise a contact-begin notification, the collision mask which
//! categories physically push this body around.

use serde::{Deserialize, Serialize};

/// Closed set of body roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Obstacle,
    ScoreGate,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Player, Category::Obstacle, Category::ScoreGate];

    /// Single-bit tag for this category
    #[inline]
    pub const fn bit(self) -> u32 {
        match self {
            Category::Player => 1 << 0,
            Category::Obstacle => 1 << 1,
            Category::ScoreGate => 1 << 2,
        }
    }

    /// Recover a category from a single-bit tag
    pub fn from_bit(bit: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bit() == bit)
    }

    /// Categories whose touch produces a contact notification
    pub const fn notifies(self) -> &'static [Category] {
        match self {
            Category::Player => &[Category::Obstacle, Category::ScoreGate],
            Category::Obstacle => &[Category::Player],
            Category::ScoreGate => &[Category::Player],
        }
    }

    /// Categories that block this body's motion
    pub const fn blocks(self) -> &'static [Category] {
        match self {
            Category::Player => &[Category::Obstacle],
            Category::Obstacle => &[Category::Player],
            // Sensor only
            Category::ScoreGate => &[],
        }
    }

    pub fn contact_mask(self) -> u32 {
        mask_of(self.notifies())
    }

    pub fn collision_mask(self) -> u32 {
        mask_of(self.blocks())
    }

    /// Sensors notify but never block
    pub fn is_sensor(self) -> bool {
        self.blocks().is_empty()
    }
}

fn mask_of(categories: &[Category]) -> u32 {
    categories.iter().fold(0, |mask, c| mask | c.bit())
}

/// Bitmask triple handed to the physics engine when a body is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMasks {
    pub category: u32,
    pub contact: u32,
    pub collision: u32,
}

impl From<Category> for CategoryMasks {
    fn from(category: Category) -> Self {
        Self {
            category: category.bit(),
            contact: category.contact_mask(),
            collision: category.collision_mask(),
        }
    }
}

impl CategoryMasks {
    /// Either side asked to be told about the other
    pub fn notifies_with(&self, other: &CategoryMasks) -> bool {
        self.contact & other.category != 0 || other.contact & self.category != 0
    }

    /// `other` pushes this body
    pub fn blocked_by(&self, other: &CategoryMasks) -> bool {
        self.collision & other.category != 0
    }
}
