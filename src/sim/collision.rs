//! Per-frame collision resolution between the player and everything else
//!
//! All checks are circle-vs-circle on center distance. Pursuers resolve to
//! one of three bands: contact (wrecked), near-miss (scored once per entry),
//! or clear (re-arms the near-miss latch).

use glam::Vec2;

use super::obstacle::Obstacle;
use super::player::PlayerVehicle;
use super::pursuer::Pursuer;
use crate::config::GameConfig;

/// Raw contact produced by a resolver pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Player rammed a pursuer; it is now destroyed
    Kill { id: u32, position: Vec2 },
    /// Pursuer entered the near-miss band
    NearMiss { id: u32, position: Vec2 },
    /// Player is overlapping an obstacle; the speed penalty was applied
    Bump { position: Vec2 },
}

/// Circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    near_miss_distance: f32,
    obstacle_damage: f32,
}

impl CollisionResolver {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            near_miss_distance: config.score.near_miss_distance,
            obstacle_damage: config.collision.obstacle_damage,
        }
    }

    /// Check one pursuer against the player, updating its state and latch
    pub fn check_pursuer(&self, player_pos: Vec2, player_radius: f32, pursuer: &mut Pursuer) -> Option<Contact> {
        if !pursuer.is_active() {
            return None;
        }

        let dist = player_pos.distance(pursuer.position);
        if dist < player_radius + pursuer.radius {
            pursuer.destroy();
            Some(Contact::Kill {
                id: pursuer.id,
                position: pursuer.position,
            })
        } else if dist < self.near_miss_distance {
            if pursuer.near_miss_latched {
                None
            } else {
                pursuer.near_miss_latched = true;
                Some(Contact::NearMiss {
                    id: pursuer.id,
                    position: pursuer.position,
                })
            }
        } else {
            pursuer.near_miss_latched = false;
            None
        }
    }

    /// Resolve all contacts for this frame.
    ///
    /// Obstacle bumps are stateless: every overlapping frame slows the player
    /// again and reports another bump.
    pub fn resolve(
        &self,
        player: &mut PlayerVehicle,
        pursuers: &mut [Pursuer],
        obstacles: &[Obstacle],
    ) -> Vec<Contact> {
        let bounds = player.bounds();
        let mut contacts: Vec<Contact> = pursuers
            .iter_mut()
            .filter_map(|p| self.check_pursuer(bounds.position, bounds.radius, p))
            .collect();

        for obstacle in obstacles {
            if circles_overlap(bounds.position, bounds.radius, obstacle.position, obstacle.radius) {
                player.apply_speed_penalty(self.obstacle_damage);
                contacts.push(Contact::Bump {
                    position: obstacle.position,
                });
            }
        }

        contacts
    }
}
