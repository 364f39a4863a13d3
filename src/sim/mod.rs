//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod category;
pub mod collision;
pub mod contact;
pub mod shape;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timeline;

pub use body::{Body, BodyId};
pub use category::{CategoryMask, PhysicsCategory};
pub use collision::{CollisionResult, Contact, ContactTracker, body_collision, find_contacts};
pub use contact::{CategoryPair, ContactEffect, classify};
pub use shape::{Aabb, Shape};
pub use spawner::{ObstacleSpawner, SpawnContext, SpawnOutcome};
pub use state::{
    GameEvent, GamePhase, GameState, ObstaclePair, RestartControl, ScoreLabel, Snapshot,
    TimedAction, World,
};
pub use tick::{TickInput, tick};
pub use timeline::Timeline;
