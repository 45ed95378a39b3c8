//! Road Rush - a top-down arcade survival racer
//!
//! Core modules:
//! - `sim`: Simulation core (player physics, pursuer AI, spawning, collisions, scoring)
//! - `config`: Data-driven game balance, validated at startup
//! - `platform`: Input adapters (keyboard / virtual joystick)
//! - `highscores`: Best-score persistence collaborator
//! - `audio`: Mapping of simulation events to volume-scaled sound cues

pub mod audio;
pub mod config;
pub mod highscores;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::{HighScoreStore, MemoryStore, StoreError};

use glam::Vec2;
use rand::Rng;

/// Fixed engine constants (not part of the tunable config)
pub mod consts {
    /// Upper bound on a frame's delta time (seconds). Long stalls are clamped to this.
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Frame rate the per-frame decay factors were tuned at
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Speed below which a coasting vehicle snaps to a stop
    pub const STOP_SPEED: f32 = 1.0;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Signed shortest rotation from `from` to `to`, in (-π, π]
#[inline]
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Wrap a value into [min, max) (infinite-world coordinates)
#[inline]
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    (value - min).rem_euclid(range) + min
}

/// Uniform random point on a circle of `radius` around `center`
pub fn random_point_on_ring(rng: &mut impl Rng, center: Vec2, radius: f32) -> Vec2 {
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    center + Vec2::from_angle(theta) * radius
}

/// Format survival time for the HUD as `M:SS`
pub fn format_time(millis: f64) -> String {
    let total_secs = (millis.max(0.0) / 1000.0).floor() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-4);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_shortest_arc_wraps() {
        // From just below +π to just above -π is a small positive turn
        let d = shortest_arc(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-4);
        let d = shortest_arc(-PI + 0.1, PI - 0.1);
        assert!((d + 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_and_lerp() {
        assert_eq!(wrap(5.0, 0.0, 10.0), 5.0);
        assert_eq!(wrap(12.0, 0.0, 10.0), 2.0);
        assert_eq!(wrap(-3.0, 0.0, 10.0), 7.0);
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((a - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65_500.0), "1:05");
        assert_eq!(format_time(600_000.0), "10:00");
    }

    #[test]
    fn test_random_point_on_ring_distance() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let center = Vec2::new(100.0, -40.0);
        for _ in 0..32 {
            let p = random_point_on_ring(&mut rng, center, 600.0);
            assert!((p.distance(center) - 600.0).abs() < 0.01);
        }
    }

    proptest! {
        #[test]
        fn normalized_angles_stay_in_half_open_range(a in -100.0f32..100.0) {
            let n = normalize_angle(a);
            prop_assert!(n > -PI - 1e-5 && n <= PI + 1e-5);
        }
    }
}
