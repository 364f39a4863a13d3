//! Rigid bodies
//!
//! A small body model: position, velocity, a shape and the
//! category masks. Static bodies (ground, walls, score zones) are moved
//! kinematically by the scene; only the character integrates forces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::{CategoryMask, PhysicsCategory};
use super::shape::{Aabb, Shape};

/// Stable entity id (allocation order doubles as iteration order)
pub type BodyId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub category: PhysicsCategory,
    /// Categories this body is physically stopped by
    pub collision_mask: CategoryMask,
    /// Categories this body wants begin-contact reports for
    pub contact_mask: CategoryMask,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    pub dynamic: bool,
    pub affected_by_gravity: bool,
    pub mass: f32,
}

impl Body {
    /// A body that never moves under physics
    pub fn fixed(id: BodyId, category: PhysicsCategory, pos: Vec2, shape: Shape) -> Self {
        let (collision_mask, contact_mask) = match category {
            PhysicsCategory::Character => (
                CategoryMask::CHARACTER_COLLISION,
                CategoryMask::CHARACTER_CONTACT,
            ),
            PhysicsCategory::Ground | PhysicsCategory::Wall => {
                (CategoryMask::CHARACTER_ONLY, CategoryMask::CHARACTER_ONLY)
            }
            PhysicsCategory::ScoreZone => (CategoryMask::NONE, CategoryMask::CHARACTER_ONLY),
        };
        Self {
            id,
            category,
            collision_mask,
            contact_mask,
            pos,
            vel: Vec2::ZERO,
            shape,
            dynamic: false,
            affected_by_gravity: false,
            mass: 1.0,
        }
    }

    /// A dynamic body with gravity initially off
    pub fn dynamic(
        id: BodyId,
        category: PhysicsCategory,
        pos: Vec2,
        shape: Shape,
        mass: f32,
    ) -> Self {
        Self {
            dynamic: true,
            mass,
            ..Self::fixed(id, category, pos, shape)
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.shape.bounds(self.pos)
    }

    /// Instantaneous velocity change of `impulse / mass`
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.dynamic && self.mass > 0.0 {
            self.vel += impulse / self.mass;
        }
    }

    /// Semi-implicit Euler step
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if !self.dynamic {
            return;
        }
        if self.affected_by_gravity {
            self.vel += gravity * dt;
        }
        self.pos += self.vel * dt;
    }

    /// Whether a touch between these bodies should be reported
    pub fn wants_contact_with(&self, other: &Body) -> bool {
        self.contact_mask.contains(other.category) || other.contact_mask.contains(self.category)
    }

    /// Whether the pair should be pushed apart
    pub fn collides_with(&self, other: &Body) -> bool {
        self.collision_mask.contains(other.category)
            && other.collision_mask.contains(self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Body {
        Body::dynamic(
            1,
            PhysicsCategory::Character,
            Vec2::new(100.0, 400.0),
            Shape::Circle { radius: 35.0 },
            0.5,
        )
    }

    #[test]
    fn test_impulse_scales_by_mass() {
        let mut body = character();
        body.apply_impulse(Vec2::new(0.0, 90.0));
        assert!((body.vel.y - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_fixed_bodies_ignore_impulses_and_gravity() {
        let mut wall = Body::fixed(
            2,
            PhysicsCategory::Wall,
            Vec2::ZERO,
            Shape::rect(Vec2::new(10.0, 10.0)),
        );
        wall.apply_impulse(Vec2::new(0.0, 90.0));
        wall.integrate(Vec2::new(0.0, -1000.0), 0.1);
        assert_eq!(wall.vel, Vec2::ZERO);
        assert_eq!(wall.pos, Vec2::ZERO);
    }

    #[test]
    fn test_gravity_only_when_enabled() {
        let mut body = character();
        body.integrate(Vec2::new(0.0, -1000.0), 0.1);
        assert_eq!(body.pos.y, 400.0);

        body.affected_by_gravity = true;
        body.integrate(Vec2::new(0.0, -1000.0), 0.1);
        assert!(body.vel.y < 0.0);
        assert!(body.pos.y < 400.0);
    }

    #[test]
    fn test_mask_table() {
        let c = character();
        let unit = Shape::rect(Vec2::ONE);
        let ground = Body::fixed(2, PhysicsCategory::Ground, Vec2::ZERO, unit);
        let zone = Body::fixed(3, PhysicsCategory::ScoreZone, Vec2::ZERO, unit);
        let wall = Body::fixed(4, PhysicsCategory::Wall, Vec2::ZERO, unit);

        assert!(c.collides_with(&ground));
        assert!(c.collides_with(&wall));
        assert!(!c.collides_with(&zone));
        assert!(c.wants_contact_with(&zone));
        assert!(zone.wants_contact_with(&c));
        // Scenery never reports contacts among itself
        assert!(!wall.wants_contact_with(&ground));
        assert!(!wall.wants_contact_with(&zone));
    }
}
