//! Trees and rocks: static world decoration with collision radii
//!
//! The player sits at the camera center, so obstacles scroll opposite the
//! player's velocity and wrap around a square window to fake an infinite map.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::Bounds;
use crate::config::{ObstacleConfig, ObstacleKindConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub kind: ObstacleKind,
    /// Visual size only
    pub size: f32,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(position: Vec2, kind: ObstacleKind, size: f32, radius: f32) -> Self {
        Self {
            position,
            kind,
            size,
            radius,
        }
    }

    /// Shift opposite to the player's motion
    pub fn update(&mut self, dt: f32, player_velocity: Vec2) {
        self.position -= player_velocity * dt;
    }

    /// Left the `world_size` square centered on the camera
    pub fn needs_repositioning(&self, camera: Vec2, world_size: f32) -> bool {
        let half = world_size / 2.0;
        let d = (self.position - camera).abs();
        d.x > half || d.y > half
    }

    /// Wrap by one world size on each axis that is out of the window
    pub fn reposition(&mut self, camera: Vec2, world_size: f32) {
        let half = world_size / 2.0;
        if self.position.x < camera.x - half {
            self.position.x += world_size;
        }
        if self.position.x > camera.x + half {
            self.position.x -= world_size;
        }
        if self.position.y < camera.y - half {
            self.position.y += world_size;
        }
        if self.position.y > camera.y + half {
            self.position.y -= world_size;
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            position: self.position,
            radius: self.radius,
        }
    }
}

/// Scatter trees then rocks in a `world_size` square around `center`.
///
/// Candidates too close to the center or to an already placed obstacle are
/// rejected; an obstacle that finds no spot within the attempt budget is
/// skipped.
pub fn scatter(
    config: &ObstacleConfig,
    center: Vec2,
    world_size: f32,
    rng: &mut impl Rng,
) -> Vec<Obstacle> {
    let mut placed = Vec::with_capacity(config.trees.count + config.rocks.count);
    place_kind(config, &config.trees, ObstacleKind::Tree, center, world_size, rng, &mut placed);
    place_kind(config, &config.rocks, ObstacleKind::Rock, center, world_size, rng, &mut placed);
    log::debug!("Scattered {} obstacles", placed.len());
    placed
}

fn place_kind(
    config: &ObstacleConfig,
    kind_config: &ObstacleKindConfig,
    kind: ObstacleKind,
    center: Vec2,
    world_size: f32,
    rng: &mut impl Rng,
    placed: &mut Vec<Obstacle>,
) {
    let half = world_size / 2.0;
    for _ in 0..kind_config.count {
        let spot = (0..config.placement_attempts).find_map(|_| {
            let candidate = Vec2::new(
                rng.random_range(center.x - half..center.x + half),
                rng.random_range(center.y - half..center.y + half),
            );
            let clear_of_center =
                candidate.distance(center) >= config.min_distance_from_center;
            let clear_of_others = placed
                .iter()
                .all(|o| candidate.distance(o.position) >= config.min_distance_between);
            (clear_of_center && clear_of_others).then_some(candidate)
        });

        if let Some(position) = spot {
            let size = if kind_config.max_size > kind_config.min_size {
                rng.random_range(kind_config.min_size..kind_config.max_size)
            } else {
                kind_config.min_size
            };
            placed.push(Obstacle::new(position, kind, size, kind_config.collision_radius));
        }
    }
}
