//! Fixed timestep simulation tick
//!
//! The game loop: input, timeline, motion, contacts, in that order.

use glam::Vec2;

use super::body::Body;
use super::category::PhysicsCategory;
use super::collision::{body_collision, find_contacts, resolve_penetration};
use super::contact::{ContactEffect, classify};
use super::spawner::{SpawnContext, SpawnOutcome};
use super::state::{GameEvent, GamePhase, RestartControl, TimedAction, World};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click location, if one happened this tick
    pub tap: Option<Vec2>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    pub fn tap_at(pos: Vec2) -> Self {
        Self {
            tap: Some(pos),
            ..Default::default()
        }
    }
}

/// Advance the world by one fixed timestep, returning what happened
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let mut input = input.clone();
    if input.idle_mode && input.tap.is_none() {
        input.tap = autopilot_tap(world);
    }

    world.time_ticks += 1;

    if let Some(pos) = input.tap {
        if handle_tap(world, pos, &mut events) {
            // Restarted - the world is fresh, nothing else runs this tick
            return events;
        }
    }

    run_timeline(world, &mut events);

    // Motion
    for pair in &mut world.obstacles {
        pair.advance();
    }
    let gravity = world.settings.gravity_vec();
    world.character.integrate(gravity, dt);
    if let Some(control) = &mut world.restart {
        control.advance();
    }

    resolve_contacts(world, &mut events);

    events
}

/// Route a tap by phase; returns true if the world was restarted
fn handle_tap(world: &mut World, pos: Vec2, events: &mut Vec<GameEvent>) -> bool {
    match world.phase {
        GamePhase::NotStarted => {
            start(world);
            events.push(GameEvent::Started);
            false
        }
        GamePhase::Playing => {
            flap(&mut world.character, world.settings.flap_impulse);
            events.push(GameEvent::Flapped);
            false
        }
        GamePhase::Dead => {
            let hit = world.restart.as_ref().is_some_and(|c| c.hit(pos));
            if hit {
                restart(world);
                events.push(GameEvent::Restarted);
            }
            hit
        }
    }
}

/// NotStarted -> Playing
fn start(world: &mut World) {
    world.phase = GamePhase::Playing;
    world.character.affected_by_gravity = true;
    world
        .character
        .apply_impulse(Vec2::new(0.0, world.settings.flap_impulse));
    // First spawn check runs on the following tick
    world
        .timeline
        .schedule_after(world.time_ticks, 1, TimedAction::SpawnCheck);
    log::info!("Run started");
}

/// Cancel fall speed, then kick upward
fn flap(character: &mut Body, impulse: f32) {
    character.vel.y = 0.0;
    character.apply_impulse(Vec2::new(0.0, impulse));
}

/// Dead -> NotStarted
fn restart(world: &mut World) {
    log::info!(
        "Restarting after scoring {} (restart #{})",
        world.state.score,
        world.restarts + 1
    );
    world.reset();
}

/// Playing -> Dead (once)
fn die(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.phase == GamePhase::Dead {
        return;
    }
    world.phase = GamePhase::Dead;
    world.state.is_game_over = true;
    world.restart = Some(RestartControl::new(
        world.settings.screen_center(),
        world.settings.restart_size,
        world.restart_reveal_ticks(),
    ));
    log::info!(
        "Died with score {} after {} ticks",
        world.state.score,
        world.time_ticks
    );
    events.push(GameEvent::Died {
        score: world.state.score,
    });
}

fn run_timeline(world: &mut World, events: &mut Vec<GameEvent>) {
    let now = world.time_ticks;
    while let Some(action) = world.timeline.pop_due(now) {
        match action {
            TimedAction::SpawnCheck => spawn_check(world, events),
            TimedAction::ExpireObstacle(id) => {
                if world.remove_obstacle(id) {
                    events.push(GameEvent::ObstacleExited { id });
                }
            }
        }
    }
}

/// The single spawn timer: try, then re-arm based on the outcome
fn spawn_check(world: &mut World, events: &mut Vec<GameEvent>) {
    let now = world.time_ticks;
    let ctx = SpawnContext {
        now,
        alive: world.is_alive(),
        pair_present: !world.obstacles.is_empty(),
    };
    let World {
        spawner,
        settings,
        ids,
        rng,
        ..
    } = world;
    let outcome = spawner.try_spawn(ctx, settings, ids, rng);

    match outcome {
        SpawnOutcome::Spawned(pair) => {
            let id = pair.id;
            events.push(GameEvent::Spawned { id, gap_y: pair.gap_y });
            world
                .timeline
                .schedule_after(now, pair.duration_ticks, TimedAction::ExpireObstacle(id));
            world.obstacles.push(pair);
            world.obstacles.sort_by_key(|p| p.id);
            world.timeline.schedule_after(
                now,
                world.spawner.interval_ticks,
                TimedAction::SpawnCheck,
            );
        }
        SpawnOutcome::Occupied => {
            events.push(GameEvent::SpawnDeferred);
            world
                .timeline
                .schedule_after(now, world.spawner.retry_ticks, TimedAction::SpawnCheck);
        }
        SpawnOutcome::NotDue { ready_at } => {
            world.timeline.schedule(ready_at, TimedAction::SpawnCheck);
        }
        // Spawning stops until restart
        SpawnOutcome::Dead => {}
    }
}

/// Detect touches, push the character out of solids, then apply the
/// effects of contacts that began this tick
fn resolve_contacts(world: &mut World, events: &mut Vec<GameEvent>) {
    let touching = {
        let mut bodies: Vec<&Body> = vec![&world.character, &world.ground];
        for pair in &world.obstacles {
            bodies.extend(pair.bodies());
        }
        find_contacts(&bodies)
    };

    // Physical response for the solid pairs
    for contact in &touching {
        let other_id = if contact.body_a == world.character.id {
            contact.body_b
        } else if contact.body_b == world.character.id {
            contact.body_a
        } else {
            continue;
        };
        let other = if other_id == world.ground.id {
            Some(world.ground.clone())
        } else {
            world
                .obstacles
                .iter()
                .flat_map(|p| p.bodies())
                .find(|b| b.id == other_id)
                .cloned()
        };
        if let Some(other) = other {
            if world.character.collides_with(&other) {
                let result = body_collision(&world.character, &other);
                resolve_penetration(&mut world.character, &result);
            }
        }
    }

    let began = world.contacts.begin_contacts(touching);
    for contact in began {
        match classify(contact.category_a, contact.category_b) {
            ContactEffect::Score => {
                let zone_id = if contact.category_a == PhysicsCategory::ScoreZone {
                    contact.body_a
                } else {
                    contact.body_b
                };
                // Zone already collected this tick (or scoring while dead)
                if world.phase != GamePhase::Playing || !world.remove_score_zone(zone_id) {
                    continue;
                }
                world.state.score += 1;
                world.score_label.set(world.state.score);
                log::debug!("Scored: {}", world.state.score);
                events.push(GameEvent::Scored {
                    score: world.state.score,
                });
            }
            ContactEffect::Death => die(world, events),
            ContactEffect::Ignore => {}
        }
    }
}

/// Demo AI: flap when below the upcoming gap and not already rising
fn autopilot_tap(world: &World) -> Option<Vec2> {
    let character = &world.character;
    match world.phase {
        GamePhase::NotStarted => Some(character.pos),
        GamePhase::Dead => None,
        GamePhase::Playing => {
            let left = character.bounds().min().x;
            let target_y = world
                .obstacles
                .iter()
                .filter(|p| p.bounds().max().x > left)
                .map(|p| p.gap_y)
                .next()
                .unwrap_or_else(|| world.settings.screen_center().y);
            // Aim a little under the gap centre; a flap rises well past it
            let below = character.pos.y < target_y - 40.0;
            let falling = character.vel.y <= 0.0;
            (below && falling).then_some(character.pos)
        }
    }
}
