//! Collision detection and response for circles and boxes
//!
//! Narrow phase is exact for the two shape kinds in the scene. Contact
//! reporting follows begin-contact semantics: a pair is reported on the
//! tick it starts touching and not again until it has separated.

use std::collections::BTreeSet;

use glam::Vec2;

use super::body::{Body, BodyId};
use super::category::PhysicsCategory;
use super::shape::{Aabb, Shape};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal, pointing from the obstacle toward the first body
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Same contact seen from the other body
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Check a circle against a box
///
/// The normal points from the box toward the circle centre.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Aabb) -> CollisionResult {
    let closest = rect.clamp_point(center);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-8 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Centre inside the box - push out through the nearest face
    let local = center - rect.center;
    let gap = rect.half - local.abs();
    let (normal, depth) = if gap.x < gap.y {
        (Vec2::new(local.x.signum(), 0.0), gap.x)
    } else {
        (Vec2::new(0.0, local.y.signum()), gap.y)
    };
    CollisionResult {
        hit: true,
        point: center - normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Check two boxes; the normal points from `b` toward `a` along the
/// axis of least penetration
pub fn rect_rect_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    if !a.overlaps(b) {
        return CollisionResult::miss();
    }
    let d = a.center - b.center;
    let overlap = (a.half + b.half) - d.abs();
    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(if d.x < 0.0 { -1.0 } else { 1.0 }, 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, if d.y < 0.0 { -1.0 } else { 1.0 }), overlap.y)
    };
    CollisionResult {
        hit: true,
        point: a.clamp_point(b.center),
        normal,
        penetration,
    }
}

/// Narrow phase between two bodies, normal pointing toward `a`
pub fn body_collision(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_rect_collision(a.pos, radius, &b.bounds())
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            circle_rect_collision(b.pos, radius, &a.bounds()).flipped()
        }
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            let offset = a.pos - b.pos;
            let dist = offset.length();
            if dist >= ra + rb {
                return CollisionResult::miss();
            }
            let normal = if dist > 1e-4 { offset / dist } else { Vec2::Y };
            CollisionResult {
                hit: true,
                point: b.pos + normal * rb,
                normal,
                penetration: ra + rb - dist,
            }
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => rect_rect_collision(&a.bounds(), &b.bounds()),
    }
}

/// Push a dynamic body out of a surface and cancel velocity into it
pub fn resolve_penetration(body: &mut Body, result: &CollisionResult) {
    if !result.hit || !body.dynamic {
        return;
    }
    body.pos += result.normal * result.penetration;
    let into_surface = body.vel.dot(result.normal);
    if into_surface < 0.0 {
        body.vel -= result.normal * into_surface;
    }
}

/// A reported touch between two bodies
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub body_a: BodyId,
    pub category_a: PhysicsCategory,
    pub body_b: BodyId,
    pub category_b: PhysicsCategory,
}

impl Contact {
    fn key(&self) -> (BodyId, BodyId) {
        pair_key(self.body_a, self.body_b)
    }
}

#[inline]
fn pair_key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a < b { (a, b) } else { (b, a) }
}

/// All currently touching pairs that want contact reports, in id order
pub fn find_contacts(bodies: &[&Body]) -> Vec<Contact> {
    let mut sorted: Vec<&Body> = bodies.to_vec();
    sorted.sort_by_key(|b| b.id);

    let mut contacts = Vec::new();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            if !a.wants_contact_with(b) {
                continue;
            }
            // Cheap reject before the exact test
            if !a.bounds().overlaps(&b.bounds()) {
                continue;
            }
            let result = body_collision(a, b);
            if result.hit {
                contacts.push(Contact {
                    body_a: a.id,
                    category_a: a.category,
                    body_b: b.id,
                    category_b: b.category,
                });
            }
        }
    }
    contacts
}

/// Remembers which pairs were touching last tick
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeSet<(BodyId, BodyId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's touching pairs, get back the ones that just began
    pub fn begin_contacts(&mut self, touching_now: Vec<Contact>) -> Vec<Contact> {
        let now: BTreeSet<_> = touching_now.iter().map(Contact::key).collect();
        let began = touching_now
            .into_iter()
            .filter(|c| !self.touching.contains(&c.key()))
            .collect();
        self.touching = now;
        began
    }

    /// Drop any remembered pair involving `id`
    pub fn forget(&mut self, id: BodyId) {
        self.touching.retain(|&(a, b)| a != id && b != id);
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }

    pub fn is_touching(&self, a: BodyId, b: BodyId) -> bool {
        self.touching.contains(&pair_key(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character_at(pos: Vec2) -> Body {
        let shape = Shape::Circle { radius: 10.0 };
        Body::dynamic(1, PhysicsCategory::Character, pos, shape, 1.0)
    }

    fn wall_at(id: BodyId, pos: Vec2) -> Body {
        Body::fixed(id, PhysicsCategory::Wall, pos, Shape::rect(Vec2::new(20.0, 100.0)))
    }

    #[test]
    fn test_circle_rect_side_hit() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(20.0, 100.0));
        // Circle just left of the box, overlapping by 2
        let result = circle_rect_collision(Vec2::new(-18.0, 0.0), 10.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(-1.0, 0.0)).length() < 0.001);
        assert!((result.penetration - 2.0).abs() < 0.001);
        assert_eq!(result.point, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_circle_rect_corner_miss() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(20.0, 20.0));
        // Bounding boxes overlap but the corner is out of reach
        let result = circle_rect_collision(Vec2::new(18.0, 18.0), 10.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_centre_inside_rect() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::new(100.0, 20.0));
        let result = circle_rect_collision(Vec2::new(0.0, 8.0), 5.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 7.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_rect_least_axis() {
        let a = Aabb::new(Vec2::new(0.0, 9.0), Vec2::new(100.0, 10.0));
        let b = Aabb::new(Vec2::ZERO, Vec2::new(100.0, 10.0));
        let result = rect_rect_collision(&a, &b);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_resolve_penetration_stops_fall() {
        let mut c = character_at(Vec2::new(0.0, 58.0));
        c.vel = Vec2::new(0.0, -300.0);
        let ground = Body::fixed(
            2,
            PhysicsCategory::Ground,
            Vec2::new(0.0, 25.0),
            Shape::rect(Vec2::new(200.0, 50.0)),
        );
        let result = body_collision(&c, &ground);
        assert!(result.hit);
        resolve_penetration(&mut c, &result);
        assert!((c.pos.y - 60.0).abs() < 0.001);
        assert_eq!(c.vel.y, 0.0);
    }

    #[test]
    fn test_find_contacts_respects_masks() {
        let c = character_at(Vec2::new(0.0, 0.0));
        let w = wall_at(2, Vec2::new(12.0, 0.0));
        // Overlapping walls never report each other
        let w2 = wall_at(3, Vec2::new(14.0, 0.0));
        let contacts = find_contacts(&[&w2, &c, &w]);
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].body_a, 1);
        assert_eq!(contacts[0].body_b, 2);
        assert_eq!(contacts[1].category_b, PhysicsCategory::Wall);
    }

    #[test]
    fn test_tracker_reports_only_beginnings() {
        let c = character_at(Vec2::new(0.0, 0.0));
        let w = wall_at(2, Vec2::new(12.0, 0.0));
        let mut tracker = ContactTracker::new();

        let began = tracker.begin_contacts(find_contacts(&[&c, &w]));
        assert_eq!(began.len(), 1);
        assert!(tracker.is_touching(2, 1));

        // Still touching - nothing new
        let began = tracker.begin_contacts(find_contacts(&[&c, &w]));
        assert!(began.is_empty());

        // Separate, then touch again
        let far = character_at(Vec2::new(-100.0, 0.0));
        assert!(tracker.begin_contacts(find_contacts(&[&far, &w])).is_empty());
        assert_eq!(tracker.begin_contacts(find_contacts(&[&c, &w])).len(), 1);
    }

    #[test]
    fn test_tracker_forget() {
        let c = character_at(Vec2::new(0.0, 0.0));
        let w = wall_at(2, Vec2::new(12.0, 0.0));
        let mut tracker = ContactTracker::new();
        tracker.begin_contacts(find_contacts(&[&c, &w]));
        tracker.forget(2);
        assert!(!tracker.is_touching(1, 2));
    }
}
