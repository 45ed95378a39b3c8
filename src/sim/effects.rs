//! Visual effects state: particles, screen shake and the boost trail
//!
//! Nothing here feeds back into gameplay. Renderers read it from the frame
//! snapshot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EffectsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    NearMiss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub alpha: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.position += self.velocity * dt;
        self.alpha = (self.life / self.max_life).max(0.0);
        self.size *= 0.98;
    }
}

/// Fading afterimage left behind while boosting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: Vec2,
    pub alpha: f32,
}

/// Trail points fade by this factor every tick
const TRAIL_FADE: f32 = 0.95;
/// and are dropped once at or below this alpha
const TRAIL_MIN_ALPHA: f32 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsBus {
    pub particles: Vec<Particle>,
    pub trail: Vec<TrailPoint>,
    /// Seconds of shake left
    shake_remaining: f32,
    shake_offset: Vec2,
    config: EffectsConfig,
}

impl EffectsBus {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.max_particles),
            trail: Vec::with_capacity(config.boost_trail_length),
            shake_remaining: 0.0,
            shake_offset: Vec2::ZERO,
            config,
        }
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.config.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.config.max_particles {
            // Drop the oldest to make room
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Ring of debris around a wrecked pursuer, plus a screen shake
    pub fn explosion(&mut self, position: Vec2, rng: &mut impl Rng) {
        let count = self.config.explosion_particles;
        let life = self.config.explosion_duration_ms / 1000.0;
        for i in 0..count {
            let angle = std::f32::consts::TAU / count as f32 * i as f32 + rng.random_range(-0.25f32..0.25);
            let speed = rng.random_range(100.0f32..300.0);
            let size = rng.random_range(3.0f32..8.0);
            self.push_particle(Particle {
                position,
                velocity: Vec2::from_angle(angle) * speed,
                life,
                max_life: life,
                alpha: 1.0,
                size,
                kind: ParticleKind::Explosion,
            });
        }
        self.add_screen_shake(self.config.screen_shake_duration_ms / 1000.0);
    }

    /// Evenly spaced glow burst at a near miss
    pub fn near_miss(&mut self, position: Vec2, rng: &mut impl Rng) {
        let count = self.config.near_miss_particles;
        let life = self.config.near_miss_glow_duration_ms / 1000.0;
        for i in 0..count {
            let angle = std::f32::consts::TAU / count as f32 * i as f32;
            let speed = rng.random_range(80.0f32..150.0);
            let size = rng.random_range(2.0f32..4.0);
            self.push_particle(Particle {
                position,
                velocity: Vec2::from_angle(angle) * speed,
                life,
                max_life: life,
                alpha: 1.0,
                size,
                kind: ParticleKind::NearMiss,
            });
        }
    }

    /// Short shake on obstacle contact
    pub fn bump(&mut self) {
        self.add_screen_shake(self.config.bump_shake_secs);
    }

    /// Extend the shake to at least `duration` seconds. Shakes never stack.
    pub fn add_screen_shake(&mut self, duration: f32) {
        self.shake_remaining = self.shake_remaining.max(duration);
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(|p| p.life > 0.0);

        if self.shake_remaining > 0.0 {
            self.shake_remaining = (self.shake_remaining - dt).max(0.0);
            let intensity = self.shake_remaining * self.config.screen_shake_intensity;
            self.shake_offset = Vec2::new(
                rng.random_range(-1.0f32..1.0) * intensity,
                rng.random_range(-1.0f32..1.0) * intensity,
            );
        } else {
            self.shake_offset = Vec2::ZERO;
        }
    }

    /// Append a trail point while boosting fast enough, then fade the trail
    pub fn record_trail(&mut self, position: Vec2, boosting: bool, speed: f32) {
        if boosting && speed > self.config.boost_trail_min_speed {
            self.trail.push(TrailPoint {
                position,
                alpha: self.config.boost_trail_alpha,
            });
            if self.trail.len() > self.config.boost_trail_length {
                self.trail.remove(0);
            }
        }

        for point in &mut self.trail {
            point.alpha *= TRAIL_FADE;
        }
        self.trail.retain(|p| p.alpha > TRAIL_MIN_ALPHA);
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    pub fn shake_remaining(&self) -> f32 {
        self.shake_remaining
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.trail.clear();
        self.shake_remaining = 0.0;
        self.shake_offset = Vec2::ZERO;
    }
}
