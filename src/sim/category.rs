//! Physics categories and masks for contact filtering
//!
//! Every body carries exactly one category. Masks are the only place
//! categories are OR-ed together: to say which other categories a body
//! collides with or wants contact reports for.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Collision class of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum PhysicsCategory {
    Character = 1 << 1,
    Ground = 1 << 2,
    Wall = 1 << 3,
    ScoreZone = 1 << 4,
}

impl PhysicsCategory {
    pub const ALL: [PhysicsCategory; 4] = [
        PhysicsCategory::Character,
        PhysicsCategory::Ground,
        PhysicsCategory::Wall,
        PhysicsCategory::ScoreZone,
    ];

    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Exact match only; a combined mask is not a category
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bits() == bits)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicsCategory::Character => "Character",
            PhysicsCategory::Ground => "Ground",
            PhysicsCategory::Wall => "Wall",
            PhysicsCategory::ScoreZone => "ScoreZone",
        }
    }
}

impl fmt::Display for PhysicsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of categories, used for collision and contact-test masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);

    /// What the character bumps into and reports
    pub const CHARACTER_COLLISION: Self =
        Self(PhysicsCategory::Ground as u32 | PhysicsCategory::Wall as u32);
    pub const CHARACTER_CONTACT: Self = Self(
        PhysicsCategory::Ground as u32
            | PhysicsCategory::Wall as u32
            | PhysicsCategory::ScoreZone as u32,
    );
    /// Scenery (ground, walls, score zones) only cares about the character
    pub const CHARACTER_ONLY: Self = Self(PhysicsCategory::Character as u32);

    #[inline]
    pub fn contains(self, category: PhysicsCategory) -> bool {
        self.0 & category.bits() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<PhysicsCategory> for CategoryMask {
    fn from(category: PhysicsCategory) -> Self {
        Self(category.bits())
    }
}

impl BitOr for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr for PhysicsCategory {
    type Output = CategoryMask;

    fn bitor(self, rhs: Self) -> CategoryMask {
        CategoryMask(self.bits() | rhs.bits())
    }
}

impl BitOr<PhysicsCategory> for CategoryMask {
    type Output = Self;

    fn bitor(self, rhs: PhysicsCategory) -> Self {
        Self(self.0 | rhs.bits())
    }
}
