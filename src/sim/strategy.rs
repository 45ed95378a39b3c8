//! Targeting strategies for pursuers
//!
//! A strategy only answers "which heading should I chase right now". Wander
//! and separation are layered on top by `Pursuer::update_with`. The default
//! update path uses `PredictivePursuit`; the others are drop-in alternatives.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::PlayerView;
use super::pursuer::Pursuer;
use crate::angle_between;

/// Produces the chase heading for one pursuer
pub trait TargetingStrategy {
    fn target_heading(&self, pursuer: &Pursuer, player: &PlayerView) -> f32;
}

/// Aim at where the player will be after `prediction_factor` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictivePursuit {
    pub prediction_factor: f32,
}

impl PredictivePursuit {
    pub fn new(prediction_factor: f32) -> Self {
        Self { prediction_factor }
    }

    pub fn predicted_position(&self, player: &PlayerView) -> Vec2 {
        player.position + player.velocity * self.prediction_factor
    }
}

impl TargetingStrategy for PredictivePursuit {
    fn target_heading(&self, pursuer: &Pursuer, player: &PlayerView) -> f32 {
        angle_between(pursuer.position, self.predicted_position(player))
    }
}

/// Circle around to a slot on a ring around the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flanking {
    /// Slot index; slots are a quarter turn apart
    pub slot: u32,
    pub distance: f32,
}

impl Flanking {
    pub const DEFAULT_DISTANCE: f32 = 300.0;

    pub fn new(slot: u32) -> Self {
        Self {
            slot,
            distance: Self::DEFAULT_DISTANCE,
        }
    }

    pub fn position(&self, player: &PlayerView) -> Vec2 {
        let offset = std::f32::consts::FRAC_PI_2 * (self.slot % 4) as f32;
        player.position + Vec2::from_angle(offset) * self.distance
    }
}

impl TargetingStrategy for Flanking {
    fn target_heading(&self, pursuer: &Pursuer, player: &PlayerView) -> f32 {
        angle_between(pursuer.position, self.position(player))
    }
}

/// Coarse behavior chosen from distance to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Chase,
    Flank,
    Swarm,
}

/// Far pursuers chase, mid-range ones flank, close ones swarm
pub fn classify_behavior(distance: f32) -> Behavior {
    if distance > 400.0 {
        Behavior::Chase
    } else if distance > 200.0 {
        Behavior::Flank
    } else {
        Behavior::Swarm
    }
}

/// Cruise speed adjustment by range: catch up when far, ease off when close
pub fn optimal_speed(base_speed: f32, distance: f32) -> f32 {
    if distance > 500.0 {
        base_speed * 1.1
    } else if distance < 150.0 {
        base_speed * 0.9
    } else {
        base_speed
    }
}

/// Switches strategy per frame using `classify_behavior`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptive {
    pub chase: PredictivePursuit,
    pub flank: Flanking,
}

impl Adaptive {
    pub fn new(prediction_factor: f32, slot: u32) -> Self {
        Self {
            chase: PredictivePursuit::new(prediction_factor),
            flank: Flanking::new(slot),
        }
    }
}

impl TargetingStrategy for Adaptive {
    fn target_heading(&self, pursuer: &Pursuer, player: &PlayerView) -> f32 {
        match classify_behavior(pursuer.position.distance(player.position)) {
            Behavior::Chase => self.chase.target_heading(pursuer, player),
            Behavior::Flank => self.flank.target_heading(pursuer, player),
            // Close in on the current position; prediction overshoots at short range
            Behavior::Swarm => angle_between(pursuer.position, player.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn pursuer_at(x: f32, y: f32) -> Pursuer {
        Pursuer::new(1, Vec2::new(x, y), 200.0, 24.0, 0.0)
    }

    #[test]
    fn test_predictive_leads_moving_player() {
        let strategy = PredictivePursuit::new(0.3);
        let player = PlayerView {
            position: Vec2::ZERO,
            velocity: Vec2::new(0.0, 100.0),
        };
        assert!((strategy.predicted_position(&player) - Vec2::new(0.0, 30.0)).length() < 1e-4);

        let p = pursuer_at(-30.0, 0.0);
        let heading = strategy.target_heading(&p, &player);
        // Aims 45° ahead of the player instead of straight at it
        assert!((heading - PI / 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_flanking_slots() {
        let player = PlayerView {
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::ZERO,
        };
        let slot1 = Flanking::new(1).position(&player);
        assert!((slot1 - Vec2::new(10.0, 310.0)).length() < 1e-3);
        let slot4 = Flanking::new(4).position(&player);
        assert!((slot4 - Vec2::new(310.0, 10.0)).length() < 1e-3);

        let p = pursuer_at(10.0, 10.0);
        let heading = Flanking::new(1).target_heading(&p, &player);
        assert!((heading - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_classify_behavior_thresholds() {
        assert_eq!(classify_behavior(401.0), Behavior::Chase);
        assert_eq!(classify_behavior(400.0), Behavior::Flank);
        assert_eq!(classify_behavior(201.0), Behavior::Flank);
        assert_eq!(classify_behavior(200.0), Behavior::Swarm);
    }

    #[test]
    fn test_optimal_speed() {
        assert!((optimal_speed(220.0, 600.0) - 242.0).abs() < 1e-3);
        assert_eq!(optimal_speed(220.0, 300.0), 220.0);
        assert!((optimal_speed(220.0, 100.0) - 198.0).abs() < 1e-3);
    }

    #[test]
    fn test_adaptive_dispatch() {
        let strategy = Adaptive::new(0.3, 0);
        let player = PlayerView {
            position: Vec2::ZERO,
            velocity: Vec2::new(0.0, 500.0),
        };

        // Close: ignores the player's velocity
        let close = pursuer_at(-100.0, 0.0);
        assert!(strategy.target_heading(&close, &player).abs() < 1e-5);

        // Mid range: heads for flank slot 0 at (300, 0)
        let mid = pursuer_at(0.0, -300.0);
        let expected = angle_between(mid.position, Vec2::new(300.0, 0.0));
        assert!((strategy.target_heading(&mid, &player) - expected).abs() < 1e-5);

        // Far: leads the player
        let far = pursuer_at(-1000.0, 0.0);
        let expected = angle_between(far.position, Vec2::new(0.0, 150.0));
        assert!((strategy.target_heading(&far, &player) - expected).abs() < 1e-5);
    }
}
