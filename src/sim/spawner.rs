//! Obstacle pair spawning
//!
//! The spawner decides whether a pair may be created and builds it. It does
//! not own a timer of its own: the game loop's single spawn check calls
//! [`ObstacleSpawner::try_spawn`] and re-arms itself based on the outcome.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::category::PhysicsCategory;
use super::shape::Shape;
use super::state::{EntityIds, ObstaclePair};
use crate::consts::{SIM_DT, SPAWN_X_OFFSET};
use crate::secs_to_ticks;
use crate::settings::Settings;

/// Why a spawn attempt did or did not create a pair
#[derive(Debug, Clone)]
pub enum SpawnOutcome {
    Spawned(ObstaclePair),
    /// The character has died; spawning has stopped for this run
    Dead,
    /// Less than the spawn interval since the last pair
    NotDue { ready_at: u64 },
    /// A pair is still on screen
    Occupied,
}

/// What the spawner needs to know about the scene
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub now: u64,
    pub alive: bool,
    pub pair_present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    /// Tick of the last successful spawn
    pub last_spawn_tick: Option<u64>,
    pub interval_ticks: u64,
    pub retry_ticks: u64,
    /// Pairs spawned this run
    pub spawned: u32,
}

impl ObstacleSpawner {
    pub fn new(settings: &Settings) -> Self {
        Self {
            last_spawn_tick: None,
            interval_ticks: secs_to_ticks(settings.spawn_interval_secs),
            retry_ticks: secs_to_ticks(settings.spawn_retry_secs),
            spawned: 0,
        }
    }

    pub fn reset(&mut self) {
        self.last_spawn_tick = None;
        self.spawned = 0;
    }

    /// Earliest tick at which a spawn is allowed
    pub fn ready_at(&self) -> u64 {
        self.last_spawn_tick
            .map_or(0, |t| t.saturating_add(self.interval_ticks))
    }

    /// Attempt to spawn one pair
    ///
    /// No-op if dead, if the interval has not elapsed since the last spawn,
    /// or if a pair is still present.
    pub fn try_spawn<R: Rng>(
        &mut self,
        ctx: SpawnContext,
        settings: &Settings,
        ids: &mut EntityIds,
        rng: &mut R,
    ) -> SpawnOutcome {
        if !ctx.alive {
            return SpawnOutcome::Dead;
        }
        let ready_at = self.ready_at();
        if ctx.now < ready_at {
            return SpawnOutcome::NotDue { ready_at };
        }
        if ctx.pair_present {
            return SpawnOutcome::Occupied;
        }

        let pair = build_pair(settings, ids, rng);
        self.last_spawn_tick = Some(ctx.now);
        self.spawned += 1;
        log::debug!(
            "Spawned pair {} at tick {} (gap y {:.1}, {} ticks to cross)",
            pair.id,
            ctx.now,
            pair.gap_y,
            pair.duration_ticks
        );
        SpawnOutcome::Spawned(pair)
    }
}

/// Build a pair just past the right edge with a random vertical offset
pub fn build_pair<R: Rng>(settings: &Settings, ids: &mut EntityIds, rng: &mut R) -> ObstaclePair {
    let mid_y = settings.screen_height / 2.0;
    let x = settings.screen_width + SPAWN_X_OFFSET;
    let jitter = settings.gap_jitter;
    let offset = if jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    let gap_y = mid_y + offset;

    let id = ids.next_id();
    let wall_shape = Shape::rect(settings.wall_size);
    let top = Body::fixed(
        ids.next_id(),
        PhysicsCategory::Wall,
        Vec2::new(x, gap_y + settings.wall_center_offset),
        wall_shape,
    );
    let bottom = Body::fixed(
        ids.next_id(),
        PhysicsCategory::Wall,
        Vec2::new(x, gap_y - settings.wall_center_offset),
        wall_shape,
    );
    let score_zone = Body::fixed(
        ids.next_id(),
        PhysicsCategory::ScoreZone,
        Vec2::new(x, gap_y),
        Shape::rect(Vec2::splat(settings.score_zone_size)),
    );

    let mut pair = ObstaclePair {
        id,
        top,
        bottom,
        score_zone: Some(score_zone),
        gap_y,
        step_x: 0.0,
        duration_ticks: 1,
        elapsed_ticks: 0,
    };

    // Travel covers the screen, the pair itself and a margin, at a pace
    // set by the screen + pair distance
    let distance = settings.screen_width + pair.bounds().size().x;
    let travel = distance + settings.offscreen_margin;
    let duration_ticks = secs_to_ticks(distance * settings.scroll_secs_per_unit);
    pair.step_x = travel / duration_ticks as f32;
    pair.duration_ticks = duration_ticks;
    for body in [&mut pair.top, &mut pair.bottom] {
        body.vel = Vec2::new(-pair.step_x / SIM_DT, 0.0);
    }
    if let Some(zone) = &mut pair.score_zone {
        zone.vel = Vec2::new(-pair.step_x / SIM_DT, 0.0);
    }
    pair
}
