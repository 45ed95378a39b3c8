//! Pursuer cars: predictive chase with wander and flock separation
//!
//! Steering works on headings, not forces. Each contribution is an angle that
//! gets summed into one target heading, which the car then turns toward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::{Bounds, PlayerView};
use super::strategy::{PredictivePursuit, TargetingStrategy};
use crate::config::PursuerConfig;
use crate::{normalize_angle, shortest_arc};

/// Pursuer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PursuerState {
    Active,
    /// Wrecked; pose frozen, timer drives the explosion animation
    Destroyed { elapsed: f32 },
}

/// Snapshot of a pursuer as seen by its siblings this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuerView {
    pub id: u32,
    pub position: Vec2,
    pub active: bool,
}

/// Separation result as an angle + strength pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Separation {
    /// Averaged, falloff-weighted push away from neighbors
    pub vector: Vec2,
    pub angle: f32,
    /// Vector length clamped to 1
    pub strength: f32,
}

/// Repulsion from active neighbors within `radius`.
///
/// Each neighbor contributes its unit away-vector weighted by
/// `(radius - dist) / radius`. Coincident neighbors (dist == 0) have no
/// defined direction and are skipped.
pub fn separation(id: u32, position: Vec2, siblings: &[PursuerView], radius: f32) -> Separation {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;

    for other in siblings {
        if other.id == id || !other.active {
            continue;
        }
        let away = position - other.position;
        let dist = away.length();
        if dist > 0.0 && dist < radius {
            let weight = (radius - dist) / radius;
            sum += away / dist * weight;
            count += 1;
        }
    }

    if count == 0 {
        return Separation::default();
    }

    let vector = sum / count as f32;
    Separation {
        vector,
        angle: vector.y.atan2(vector.x),
        strength: vector.length().min(1.0),
    }
}

/// An AI-driven pursuer car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub id: u32,
    pub position: Vec2,
    pub angle: f32,
    /// Fixed at spawn
    pub speed: f32,
    pub velocity: Vec2,
    pub radius: f32,
    pub wander_phase: f32,
    pub retarget_timer: f32,
    /// Last refreshed chase point
    pub target: Vec2,
    pub state: PursuerState,
    /// Set while inside the near-miss band; cleared once clear of it
    pub near_miss_latched: bool,
}

impl Pursuer {
    pub fn new(id: u32, position: Vec2, speed: f32, radius: f32, wander_phase: f32) -> Self {
        Self {
            id,
            position,
            angle: 0.0,
            speed,
            velocity: Vec2::ZERO,
            radius,
            wander_phase,
            retarget_timer: 0.0,
            target: position,
            state: PursuerState::Active,
            near_miss_latched: false,
        }
    }

    /// Roll a new pursuer: base speed ± variance, scaled by the tier multiplier
    pub fn spawn(
        id: u32,
        position: Vec2,
        radius: f32,
        speed_multiplier: f32,
        config: &PursuerConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let variance = if config.speed_variance > 0.0 {
            rng.random_range(-config.speed_variance..config.speed_variance)
        } else {
            0.0
        };
        let speed = (config.base_speed + variance) * speed_multiplier;
        let wander_phase = rng.random_range(0.0..std::f32::consts::TAU);
        Self::new(id, position, speed, radius, wander_phase)
    }

    pub fn is_active(&self) -> bool {
        self.state == PursuerState::Active
    }

    pub fn is_destroyed(&self) -> bool {
        !self.is_active()
    }

    /// Seconds since destruction, if wrecked
    pub fn destroyed_elapsed(&self) -> Option<f32> {
        match self.state {
            PursuerState::Destroyed { elapsed } => Some(elapsed),
            PursuerState::Active => None,
        }
    }

    /// Wrecked and finished animating
    pub fn is_expired(&self, animation_secs: f32) -> bool {
        self.destroyed_elapsed().is_some_and(|e| e > animation_secs)
    }

    pub fn view(&self) -> PursuerView {
        PursuerView {
            id: self.id,
            position: self.position,
            active: self.is_active(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            position: self.position,
            radius: self.radius,
        }
    }

    /// Advance one frame with the default predictive chase
    pub fn update(
        &mut self,
        dt: f32,
        player: &PlayerView,
        siblings: &[PursuerView],
        config: &PursuerConfig,
        rng: &mut impl Rng,
    ) {
        let strategy = PredictivePursuit::new(config.prediction_factor);
        self.update_with(&strategy, dt, player, siblings, config, rng);
    }

    /// Advance one frame using `strategy` for the chase heading
    pub fn update_with(
        &mut self,
        strategy: &dyn TargetingStrategy,
        dt: f32,
        player: &PlayerView,
        siblings: &[PursuerView],
        config: &PursuerConfig,
        rng: &mut impl Rng,
    ) {
        if let PursuerState::Destroyed { elapsed } = &mut self.state {
            *elapsed += dt;
            return;
        }

        self.retarget_timer += dt;
        if self.retarget_timer > config.retarget_interval {
            self.target = player.position;
            self.retarget_timer = 0.0;
        }

        let mut heading = strategy.target_heading(self, player);

        // Wander: bounded offset from a slowly drifting phase
        self.wander_phase += rng.random_range(-1.0f32..1.0) * config.wander_rate * dt;
        heading += self.wander_phase.sin() * config.wander_strength;

        let push = separation(self.id, self.position, siblings, config.separation_distance);
        heading += push.angle * push.strength;

        let step = (config.turn_rate * dt).min(1.0);
        self.angle = normalize_angle(self.angle + shortest_arc(self.angle, heading) * step);

        self.velocity = Vec2::from_angle(self.angle) * self.speed;
        self.position += self.velocity * dt;
    }

    /// Wreck the car. No-op if already destroyed.
    pub fn destroy(&mut self) {
        if self.is_active() {
            self.state = PursuerState::Destroyed { elapsed: 0.0 };
            self.velocity = Vec2::ZERO;
        }
    }

    /// Outside the view rectangle around the camera plus a margin
    pub fn is_off_screen(&self, camera: Vec2, screen: Vec2, margin: f32) -> bool {
        let half = screen / 2.0 + Vec2::splat(margin);
        let d = (self.position - camera).abs();
        d.x > half.x || d.y > half.y
    }
}
