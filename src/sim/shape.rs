//! Axis-aligned geometry for bodies and hit tests
//!
//! Everything in the scene is either a circle (the character) or an
//! axis-aligned rectangle (ground, walls, score zones, restart control).
//! Coordinates are y-up with the origin at the bottom-left of the screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box stored as centre + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Point containment (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half.x && d.y <= self.half.y
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (other.center - self.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Same centre, extents multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            center: self.center,
            half: self.half * factor,
        }
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Self {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Self {
            center: (min + max) / 2.0,
            half: (max - min) / 2.0,
        }
    }

    /// Closest point inside the box to `point`
    #[inline]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }
}

/// Collision shape, positioned by the owning body's centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half: Vec2 },
}

impl Shape {
    pub fn rect(size: Vec2) -> Self {
        Shape::Rect { half: size / 2.0 }
    }

    /// Bounding box when centred at `center`
    pub fn bounds(&self, center: Vec2) -> Aabb {
        match *self {
            Shape::Circle { radius } => Aabb {
                center,
                half: Vec2::splat(radius),
            },
            Shape::Rect { half } => Aabb { center, half },
        }
    }
}
