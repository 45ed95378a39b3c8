//! Per-frame simulation step
//!
//! Update order within a tick:
//! survival clock → player → world scroll → pursuers → spawning →
//! score clock → effects → collisions → scoring/effects from contacts → prune.

use glam::Vec2;

use super::collision::Contact;
use super::events::GameEvent;
use super::pursuer::{Pursuer, PursuerView};
use super::state::{GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;
use crate::platform::sanitize;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Desired heading as a vector, |v| <= 1 (zero = coast)
    pub direction: Vec2,
    /// Boost request (edge: set on the press only)
    pub boost: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode: the AI drives the player
    pub autopilot: bool,
}

/// Clamp a wall-clock delta into a usable step
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = clamp_dt(dt);
    let (direction, boost) = if input.autopilot {
        autopilot(state)
    } else {
        (sanitize(input.direction), input.boost)
    };

    state.time_ticks += 1;
    state.survival_ms += f64::from(dt) * 1000.0;

    // Player
    state.player.update(dt, direction, boost, &mut state.events);
    state
        .effects
        .record_trail(state.player.position, state.player.is_boosting(), state.player.speed);

    // The player stays put; the world scrolls past it
    let camera = state.player.position;
    let world_size = state.config.world.size;
    for obstacle in &mut state.obstacles {
        obstacle.update(dt, state.player.velocity);
        if obstacle.needs_repositioning(camera, world_size) {
            obstacle.reposition(camera, world_size);
        }
    }

    // Pursuers all steer against the same pre-move snapshot
    let player_view = state.player.view();
    let siblings: Vec<PursuerView> = state.pursuers.iter().map(Pursuer::view).collect();
    for pursuer in &mut state.pursuers {
        pursuer.update(dt, &player_view, &siblings, &state.config.pursuer, &mut state.rng);
    }

    // Spawning
    let tier_before = state.spawner.tier_index();
    if let Some(pursuer) = state.spawner.update(
        dt,
        &state.pursuers,
        state.survival_ms,
        state.player.position,
        &mut state.rng,
    ) {
        state.push_pursuer(pursuer);
    }
    let tier = state.spawner.tier_index();
    if tier != tier_before {
        state.events.push(GameEvent::TierChanged { tier });
    }

    // Clocks
    if state.score.tick(dt) {
        state.events.push(GameEvent::ComboChanged { combo: 0 });
    }
    state.effects.update(dt, &mut state.rng);

    // Collisions
    let contacts = state
        .resolver
        .resolve(&mut state.player, &mut state.pursuers, &state.obstacles);
    for contact in contacts {
        apply_contact(state, contact);
    }

    // Wrecks leave once their explosion has played out
    let animation_secs = state.config.effects.explosion_duration_ms / 1000.0;
    state.pursuers.retain(|p| !p.is_expired(animation_secs));
}

fn apply_contact(state: &mut GameState, contact: Contact) {
    match contact {
        Contact::Kill { id, position } => {
            state.kills += 1;
            let points = state.score.on_kill();
            let combo = state.score.combo();
            state.effects.explosion(position, &mut state.rng);
            state.events.push(GameEvent::PursuerDestroyed {
                id,
                position,
                points,
                combo,
            });
            state.events.push(GameEvent::ComboChanged { combo });
            log::debug!("Pursuer {} destroyed for {:.0} points (combo {})", id, points, combo);
        }
        Contact::NearMiss { id, position } => {
            let points = state.score.on_near_miss();
            state.effects.near_miss(position, &mut state.rng);
            state.events.push(GameEvent::NearMiss { id, position, points });
            log::debug!("Near miss with pursuer {} for {:.0} points", id, points);
        }
        Contact::Bump { position } => {
            state.effects.bump();
            state.events.push(GameEvent::ObstacleBump { position });
        }
    }
}

/// Range within which the autopilot fires its boost at a target
const AUTOPILOT_BOOST_RANGE: f32 = 300.0;

/// Demo driver: ram the nearest pursuer, boosting when it gets close.
/// With nothing to chase it cruises in a slow circle.
fn autopilot(state: &GameState) -> (Vec2, bool) {
    let player = state.player.position;
    let nearest = state
        .pursuers
        .iter()
        .filter(|p| p.is_active())
        .min_by(|a, b| {
            a.position
                .distance_squared(player)
                .partial_cmp(&b.position.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match nearest {
        Some(target) => {
            let to_target = target.position - player;
            let boost = state.player.boost_ready() && to_target.length() < AUTOPILOT_BOOST_RANGE;
            (to_target.normalize_or_zero(), boost)
        }
        None => {
            let phase = state.time_ticks as f32 * 0.01;
            (Vec2::from_angle(phase), false)
        }
    }
}
