//! Contact classification
//!
//! Maps an unordered pair of categories to the gameplay effect it has.
//! The pair is canonicalised (smaller category value first) so the
//! lookup never depends on which body the physics step reported first.

use serde::{Deserialize, Serialize};

use super::category::PhysicsCategory;

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactEffect {
    /// Score one point and remove the score zone
    Score,
    /// Kill the character (if still alive)
    Death,
    /// Nothing happens
    Ignore,
}

/// An unordered category pair stored smaller-first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryPair {
    pub low: PhysicsCategory,
    pub high: PhysicsCategory,
}

impl CategoryPair {
    pub fn new(a: PhysicsCategory, b: PhysicsCategory) -> Self {
        if a.bits() <= b.bits() {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// Classify a contact between bodies of categories `a` and `b`
pub fn classify(a: PhysicsCategory, b: PhysicsCategory) -> ContactEffect {
    use PhysicsCategory::*;

    let pair = CategoryPair::new(a, b);
    match (pair.low, pair.high) {
        (Character, ScoreZone) => ContactEffect::Score,
        (Character, Wall) | (Character, Ground) => ContactEffect::Death,
        _ => ContactEffect::Ignore,
    }
}
