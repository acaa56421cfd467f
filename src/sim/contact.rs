//! Contact classification
//!
//! A gate on either side of a contact scores; anything else the physics
//! world bothered to report is lethal.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::physics::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    Score,
    Collision,
}

pub fn classify(a: Category, b: Category) -> ContactOutcome {
    if a == Category::ScoreGate || b == Category::ScoreGate {
        ContactOutcome::Score
    } else {
        ContactOutcome::Collision
    }
}

impl From<&Contact> for ContactOutcome {
    fn from(contact: &Contact) -> Self {
        classify(contact.category_a, contact.category_b)
    }
}
