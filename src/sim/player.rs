//! Player vehicle physics and boost state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent};
use crate::config::PlayerConfig;
use crate::consts::{REFERENCE_FPS, STOP_SPEED};
use crate::{normalize_angle, shortest_arc};

/// Boost lifecycle: Ready -> Active -> Cooldown -> Ready
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BoostState {
    #[default]
    Ready,
    Active { remaining_ms: f32 },
    Cooldown { remaining_ms: f32 },
}

/// Read-only view of the player published to pursuers each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Circle used for collision checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub position: Vec2,
    pub radius: f32,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerVehicle {
    /// World position. The camera is centered here.
    pub position: Vec2,
    /// Facing (radians, (-π, π])
    pub angle: f32,
    pub speed: f32,
    /// Always `(cos angle, sin angle) * speed` after an update
    pub velocity: Vec2,
    pub boost: BoostState,
    pub radius: f32,
    config: PlayerConfig,
}

impl PlayerVehicle {
    pub fn new(position: Vec2, radius: f32, config: PlayerConfig) -> Self {
        Self {
            position,
            angle: 0.0,
            speed: 0.0,
            velocity: Vec2::ZERO,
            boost: BoostState::Ready,
            radius,
            config,
        }
    }

    /// Advance one frame from a normalized input vector
    pub fn update(&mut self, dt: f32, input: Vec2, boost_requested: bool, events: &mut EventQueue) {
        self.update_boost(dt, boost_requested, events);

        if input.length_squared() > 0.0 {
            let target = input.y.atan2(input.x);
            let step = (self.config.rotation_speed * dt).min(1.0);
            self.angle = normalize_angle(self.angle + shortest_arc(self.angle, target) * step);

            let cap = self.top_speed();
            self.speed = (self.speed + self.config.acceleration * dt).min(cap);
        } else {
            // Coast: per-frame decay normalized to the reference frame rate
            self.speed *= self.config.deceleration.powf(dt * REFERENCE_FPS);
            if self.speed < STOP_SPEED {
                self.speed = 0.0;
            }
        }

        self.speed = self.speed.clamp(0.0, self.config.speed_ceiling());
        self.sync_velocity();
    }

    fn update_boost(&mut self, dt: f32, requested: bool, events: &mut EventQueue) {
        let elapsed_ms = dt * 1000.0;
        self.boost = match self.boost {
            BoostState::Ready if requested => {
                events.push(GameEvent::BoostActivated);
                log::debug!("Boost activated");
                BoostState::Active {
                    remaining_ms: self.config.boost_duration_ms,
                }
            }
            BoostState::Ready => BoostState::Ready,
            BoostState::Active { remaining_ms } => {
                let remaining_ms = remaining_ms - elapsed_ms;
                if remaining_ms <= 0.0 {
                    BoostState::Cooldown {
                        remaining_ms: self.config.boost_cooldown_ms,
                    }
                } else {
                    BoostState::Active { remaining_ms }
                }
            }
            BoostState::Cooldown { remaining_ms } => {
                let remaining_ms = remaining_ms - elapsed_ms;
                if remaining_ms <= 0.0 {
                    BoostState::Ready
                } else {
                    BoostState::Cooldown { remaining_ms }
                }
            }
        };
    }

    fn sync_velocity(&mut self) {
        self.velocity = Vec2::from_angle(self.angle) * self.speed;
    }

    /// Current speed cap (boost-dependent)
    pub fn top_speed(&self) -> f32 {
        if self.is_boosting() {
            self.config.speed_ceiling()
        } else {
            self.config.max_speed
        }
    }

    pub fn is_boosting(&self) -> bool {
        matches!(self.boost, BoostState::Active { .. })
    }

    pub fn boost_ready(&self) -> bool {
        self.boost == BoostState::Ready
    }

    /// HUD cooldown indicator: 0 = ready, 1 = just used
    pub fn boost_cooldown_progress(&self) -> f32 {
        match self.boost {
            BoostState::Cooldown { remaining_ms } => {
                (remaining_ms / self.config.boost_cooldown_ms).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Multiplicative speed loss (obstacle contact)
    pub fn apply_speed_penalty(&mut self, fraction: f32) {
        self.speed *= (1.0 - fraction).clamp(0.0, 1.0);
        self.sync_velocity();
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            position: self.position,
            velocity: self.velocity,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            position: self.position,
            radius: self.radius,
        }
    }

    /// Back to rest at `position` (scene reset)
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.angle = 0.0;
        self.speed = 0.0;
        self.velocity = Vec2::ZERO;
        self.boost = BoostState::Ready;
    }
}
