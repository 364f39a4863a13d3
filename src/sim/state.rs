//! Game state and the long-lived world
//!
//! The world is built once and reset in place on restart; a reset world is
//! indistinguishable from a freshly built one apart from the RNG stream.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::category::PhysicsCategory;
use super::collision::ContactTracker;
use super::shape::{Aabb, Shape};
use super::spawner::ObstacleSpawner;
use super::timeline::Timeline;
use crate::consts::{CHARACTER_WIDTH, SCORE_LABEL_INSET};
use crate::secs_to_ticks;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Character hovering, waiting for the first tap
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended, restart control shown
    Dead,
}

/// Score and game-over flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub is_game_over: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.is_game_over = false;
    }
}

/// Things that happened during a tick, for audio/visual front-ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Flapped,
    Spawned { id: BodyId, gap_y: f32 },
    /// Spawn check found a pair still on screen
    SpawnDeferred,
    Scored { score: u64 },
    Died { score: u64 },
    ObstacleExited { id: BodyId },
    Restarted,
}

/// Deferred work on the world timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedAction {
    /// The single spawn timer firing
    SpawnCheck,
    /// An obstacle pair finished its translation
    ExpireObstacle(BodyId),
}

/// Top wall, bottom wall and a score zone travelling left together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: BodyId,
    pub top: Body,
    pub bottom: Body,
    /// Removed once the character scores it
    pub score_zone: Option<Body>,
    /// Vertical centre of the gap
    pub gap_y: f32,
    /// Horizontal distance moved per tick
    pub step_x: f32,
    pub duration_ticks: u64,
    pub elapsed_ticks: u64,
}

impl ObstaclePair {
    /// Union of all child bounds
    pub fn bounds(&self) -> Aabb {
        let mut bounds = self.top.bounds().union(&self.bottom.bounds());
        if let Some(zone) = &self.score_zone {
            bounds = bounds.union(&zone.bounds());
        }
        bounds
    }

    pub fn finished(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }

    /// Translate one tick along the path
    pub fn advance(&mut self) {
        if self.finished() {
            return;
        }
        let offset = Vec2::new(-self.step_x, 0.0);
        self.top.pos += offset;
        self.bottom.pos += offset;
        if let Some(zone) = &mut self.score_zone {
            zone.pos += offset;
        }
        self.elapsed_ticks += 1;
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        [Some(&self.top), Some(&self.bottom), self.score_zone.as_ref()]
            .into_iter()
            .flatten()
    }
}

/// The restart button shown after death
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartControl {
    pub bounds: Aabb,
    /// Current scale, 0 to 1
    pub scale: f32,
    pub reveal_ticks: u64,
    pub elapsed_ticks: u64,
}

impl RestartControl {
    pub fn new(center: Vec2, size: Vec2, reveal_ticks: u64) -> Self {
        Self {
            bounds: Aabb::new(center, size),
            scale: 0.0,
            reveal_ticks,
            elapsed_ticks: 0,
        }
    }

    /// Linear scale-in
    pub fn advance(&mut self) {
        if self.elapsed_ticks < self.reveal_ticks {
            self.elapsed_ticks += 1;
        }
        self.scale = (self.elapsed_ticks as f32 / self.reveal_ticks as f32).min(1.0);
    }

    pub fn current_bounds(&self) -> Aabb {
        self.bounds.scaled(self.scale)
    }

    /// Hit test against the bounds as currently drawn
    pub fn hit(&self, point: Vec2) -> bool {
        self.scale > 0.0 && self.current_bounds().contains(point)
    }
}

/// Score text near the top of the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLabel {
    pub text: String,
    pub pos: Vec2,
}

impl ScoreLabel {
    pub fn set(&mut self, score: u64) {
        self.text = score.to_string();
    }
}

/// Entity id allocator
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: BodyId,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> BodyId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Serializable summary of a world at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub score: u64,
    pub is_game_over: bool,
    pub character_pos: Vec2,
    pub character_vel: Vec2,
    pub obstacle_xs: Vec<f32>,
    pub restart_scale: Option<f32>,
}

/// The complete mutable game world
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    /// Ticks since the scene was (re)built
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub state: GameState,
    pub character: Body,
    pub ground: Body,
    /// Active obstacle pairs (sorted by id)
    pub obstacles: Vec<ObstaclePair>,
    pub spawner: ObstacleSpawner,
    pub restart: Option<RestartControl>,
    pub score_label: ScoreLabel,
    pub timeline: Timeline<TimedAction>,
    pub contacts: ContactTracker,
    /// Completed restarts since launch
    pub restarts: u32,
    pub(crate) rng: Pcg32,
    pub(crate) ids: EntityIds,
}

impl World {
    /// Build a fresh scene
    pub fn new(settings: Settings) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        let spawner = ObstacleSpawner::new(&settings);
        let mut ids = EntityIds::default();
        let character = build_character(&settings, ids.next_id());
        let ground = build_ground(&settings, ids.next_id());
        let score_label = build_score_label(&settings);

        Self {
            settings,
            time_ticks: 0,
            phase: GamePhase::NotStarted,
            state: GameState::new(),
            character,
            ground,
            obstacles: Vec::new(),
            spawner,
            restart: None,
            score_label,
            timeline: Timeline::new(),
            contacts: ContactTracker::new(),
            restarts: 0,
            rng,
            ids,
        }
    }

    /// Build with default settings and the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Settings {
            seed,
            ..Settings::default()
        })
    }

    /// Return every field to its freshly-built value
    ///
    /// Pending timeline actions are dropped. The RNG stream carries on so
    /// successive runs get different gaps.
    pub fn reset(&mut self) {
        self.timeline.clear();
        self.contacts.clear();
        self.obstacles.clear();
        self.restart = None;
        self.state.reset();
        self.spawner.reset();
        self.phase = GamePhase::NotStarted;
        self.time_ticks = 0;

        self.ids = EntityIds::default();
        self.character = build_character(&self.settings, self.ids.next_id());
        self.ground = build_ground(&self.settings, self.ids.next_id());
        self.score_label = build_score_label(&self.settings);
        self.restarts += 1;
    }

    pub fn is_alive(&self) -> bool {
        self.phase != GamePhase::Dead
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BodyId {
        self.ids.next_id()
    }

    /// Remove a score zone body (after it has been collected)
    pub fn remove_score_zone(&mut self, id: BodyId) -> bool {
        for pair in &mut self.obstacles {
            if pair.score_zone.as_ref().is_some_and(|z| z.id == id) {
                pair.score_zone = None;
                self.contacts.forget(id);
                return true;
            }
        }
        false
    }

    /// Remove a whole pair; returns whether it was present
    pub fn remove_obstacle(&mut self, id: BodyId) -> bool {
        let Some(idx) = self.obstacles.iter().position(|p| p.id == id) else {
            return false;
        };
        let pair = self.obstacles.remove(idx);
        for body in pair.bodies() {
            self.contacts.forget(body.id);
        }
        true
    }

    /// Ticks the restart control takes to scale in
    pub fn restart_reveal_ticks(&self) -> u64 {
        secs_to_ticks(self.settings.restart_reveal_secs)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            time_ticks: self.time_ticks,
            score: self.state.score,
            is_game_over: self.state.is_game_over,
            character_pos: self.character.pos,
            character_vel: self.character.vel,
            obstacle_xs: self.obstacles.iter().map(|p| p.top.pos.x).collect(),
            restart_scale: self.restart.as_ref().map(|r| r.scale),
        }
    }
}

fn build_character(settings: &Settings, id: BodyId) -> Body {
    let center = settings.screen_center();
    Body::dynamic(
        id,
        PhysicsCategory::Character,
        Vec2::new(center.x - CHARACTER_WIDTH, center.y),
        Shape::Circle {
            radius: settings.character_radius,
        },
        settings.character_mass,
    )
}

fn build_ground(settings: &Settings, id: BodyId) -> Body {
    let size = Vec2::new(settings.screen_width, settings.ground_height);
    Body::fixed(
        id,
        PhysicsCategory::Ground,
        Vec2::new(settings.screen_width / 2.0, settings.ground_height / 2.0),
        Shape::rect(size),
    )
}

fn build_score_label(settings: &Settings) -> ScoreLabel {
    ScoreLabel {
        text: "0".to_string(),
        pos: Vec2::new(
            settings.screen_width / 2.0,
            settings.screen_height - SCORE_LABEL_INSET,
        ),
    }
}
