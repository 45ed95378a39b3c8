//! Game balance configuration
//!
//! All tuning lives in one immutable `GameConfig` that is validated once at
//! startup and handed to each component's constructor. Loaded from JSON;
//! missing fields fall back to the shipped defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Configuration problems detected at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("difficulty tier table is empty")]
    EmptyTierTable,
    #[error("first difficulty tier must start at 0 ms, found {0} ms")]
    FirstTierNotAtZero(f64),
    #[error("difficulty tier {index} threshold {time_ms} ms does not follow the previous tier")]
    UnorderedTiers { index: usize, time_ms: f64 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Player vehicle handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Top speed without boost (px/s)
    pub max_speed: f32,
    /// Linear acceleration while steering (px/s²)
    pub acceleration: f32,
    /// Per-frame coast factor at the reference frame rate
    pub deceleration: f32,
    /// Heading smoothing gain (1/s)
    pub rotation_speed: f32,
    /// Top speed multiplier while boosting
    pub boost_multiplier: f32,
    pub boost_duration_ms: f32,
    pub boost_cooldown_ms: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_speed: 350.0,
            acceleration: 150.0,
            deceleration: 0.95,
            rotation_speed: 3.5,
            boost_multiplier: 1.4,
            boost_duration_ms: 3000.0,
            boost_cooldown_ms: 20000.0,
        }
    }
}

impl PlayerConfig {
    /// Absolute speed ceiling (boosted)
    pub fn speed_ceiling(&self) -> f32 {
        self.max_speed * self.boost_multiplier.max(1.0)
    }
}

/// Pursuer AI tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    pub base_speed: f32,
    /// Per-instance speed jitter, uniform in ±variance
    pub speed_variance: f32,
    /// Radius of the spawn ring around the player
    pub spawn_distance: f32,
    /// Pursuers placed immediately when a run starts
    pub initial_count: usize,
    /// Look-ahead time (s) applied to the player's velocity
    pub prediction_factor: f32,
    /// Max heading offset (rad) contributed by wander
    pub wander_strength: f32,
    /// Wander phase random-walk rate (rad/s at full deflection)
    pub wander_rate: f32,
    pub separation_distance: f32,
    /// Heading smoothing gain (1/s)
    pub turn_rate: f32,
    /// Seconds between target refreshes
    pub retarget_interval: f32,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            base_speed: 220.0,
            speed_variance: 30.0,
            spawn_distance: 600.0,
            initial_count: 2,
            prediction_factor: 0.3,
            wander_strength: 0.1,
            wander_rate: 2.0,
            separation_distance: 80.0,
            turn_rate: 2.5,
            retarget_interval: 0.5,
        }
    }
}

/// One row of the difficulty curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// Survival time (ms) at which this tier takes over
    pub time_ms: f64,
    pub max_pursuers: usize,
    pub speed_multiplier: f32,
    pub spawn_interval_ms: f32,
}

impl DifficultyTier {
    pub const fn new(
        time_ms: f64,
        max_pursuers: usize,
        speed_multiplier: f32,
        spawn_interval_ms: f32,
    ) -> Self {
        Self {
            time_ms,
            max_pursuers,
            speed_multiplier,
            spawn_interval_ms,
        }
    }
}

/// Ordered difficulty curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub tiers: Vec<DifficultyTier>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                DifficultyTier::new(0.0, 2, 0.85, 5000.0),
                DifficultyTier::new(30_000.0, 3, 0.90, 4000.0),
                DifficultyTier::new(60_000.0, 4, 0.95, 3500.0),
                DifficultyTier::new(120_000.0, 5, 1.0, 3000.0),
            ],
        }
    }
}

/// Placement and size range for one obstacle category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleKindConfig {
    pub count: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub collision_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub trees: ObstacleKindConfig,
    pub rocks: ObstacleKindConfig,
    /// Keep-out radius around the player's start
    pub min_distance_from_center: f32,
    pub min_distance_between: f32,
    /// Rejection-sampling attempts per obstacle
    pub placement_attempts: u32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            trees: ObstacleKindConfig {
                count: 18,
                min_size: 40.0,
                max_size: 60.0,
                collision_radius: 25.0,
            },
            rocks: ObstacleKindConfig {
                count: 12,
                min_size: 30.0,
                max_size: 50.0,
                collision_radius: 20.0,
            },
            min_distance_from_center: 200.0,
            min_distance_between: 80.0,
            placement_attempts: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub player_radius: f32,
    pub pursuer_radius: f32,
    /// Fraction of speed lost per overlapping frame against an obstacle
    pub obstacle_damage: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            player_radius: 25.0,
            pursuer_radius: 24.0,
            obstacle_damage: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub survival_per_second: f64,
    pub pursuer_destroyed: f64,
    pub near_miss: f64,
    pub near_miss_distance: f32,
    pub combo_timeout_ms: f64,
    /// Kill bonus per combo step
    pub kill_combo_bonus: f64,
    /// Near-miss bonus per combo step
    pub near_miss_combo_bonus: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            survival_per_second: 10.0,
            pursuer_destroyed: 100.0,
            near_miss: 25.0,
            near_miss_distance: 60.0,
            combo_timeout_ms: 3000.0,
            kill_combo_bonus: 0.2,
            near_miss_combo_bonus: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub explosion_particles: usize,
    /// Also the destroyed-pursuer animation length
    pub explosion_duration_ms: f32,
    pub near_miss_particles: usize,
    pub near_miss_glow_duration_ms: f32,
    pub screen_shake_intensity: f32,
    pub screen_shake_duration_ms: f32,
    /// Shake added per obstacle bump (s)
    pub bump_shake_secs: f32,
    pub boost_trail_length: usize,
    pub boost_trail_alpha: f32,
    /// Player speed above which the boost trail is recorded
    pub boost_trail_min_speed: f32,
    pub max_particles: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            explosion_particles: 20,
            explosion_duration_ms: 800.0,
            near_miss_particles: 8,
            near_miss_glow_duration_ms: 300.0,
            screen_shake_intensity: 8.0,
            screen_shake_duration_ms: 200.0,
            bump_shake_secs: 0.1,
            boost_trail_length: 15,
            boost_trail_alpha: 0.6,
            boost_trail_min_speed: 100.0,
            max_particles: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.7,
            sfx_volume: 0.8,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side of the square window obstacles live in around the camera
    pub size: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Extra border around the viewport before a pursuer counts as off-screen
    pub offscreen_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 3000.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            offscreen_margin: 200.0,
        }
    }
}

impl WorldConfig {
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// The player starts (and stays) at the viewport center
    pub fn start_position(&self) -> Vec2 {
        self.viewport() / 2.0
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub pursuer: PursuerConfig,
    pub difficulty: DifficultyConfig,
    pub obstacles: ObstacleConfig,
    pub collision: CollisionConfig,
    pub score: ScoreConfig,
    pub effects: EffectsConfig,
    pub audio: AudioConfig,
    pub world: WorldConfig,
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check startup invariants. The simulation assumes a config that passed this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tiers = &self.difficulty.tiers;
        let first = tiers.first().ok_or(ConfigError::EmptyTierTable)?;
        if first.time_ms != 0.0 {
            return Err(ConfigError::FirstTierNotAtZero(first.time_ms));
        }
        for (index, pair) in tiers.windows(2).enumerate() {
            if pair[1].time_ms <= pair[0].time_ms {
                return Err(ConfigError::UnorderedTiers {
                    index: index + 1,
                    time_ms: pair[1].time_ms,
                });
            }
        }
        for tier in tiers {
            positive("difficulty.spawn_interval_ms", tier.spawn_interval_ms)?;
            positive("difficulty.speed_multiplier", tier.speed_multiplier)?;
        }

        positive("player.max_speed", self.player.max_speed)?;
        positive("player.acceleration", self.player.acceleration)?;
        positive("player.rotation_speed", self.player.rotation_speed)?;
        positive("player.boost_multiplier", self.player.boost_multiplier)?;
        in_range("player.deceleration", self.player.deceleration, 0.0, 1.0)?;

        positive("pursuer.base_speed", self.pursuer.base_speed)?;
        in_range(
            "pursuer.speed_variance",
            self.pursuer.speed_variance,
            0.0,
            self.pursuer.base_speed,
        )?;
        positive("pursuer.separation_distance", self.pursuer.separation_distance)?;
        positive("pursuer.spawn_distance", self.pursuer.spawn_distance)?;
        positive("pursuer.turn_rate", self.pursuer.turn_rate)?;

        positive("collision.player_radius", self.collision.player_radius)?;
        positive("collision.pursuer_radius", self.collision.pursuer_radius)?;
        in_range("collision.obstacle_damage", self.collision.obstacle_damage, 0.0, 1.0)?;
        positive("obstacles.trees.collision_radius", self.obstacles.trees.collision_radius)?;
        positive("obstacles.rocks.collision_radius", self.obstacles.rocks.collision_radius)?;

        positive("score.combo_timeout_ms", self.score.combo_timeout_ms as f32)?;
        non_negative("score.survival_per_second", self.score.survival_per_second)?;
        non_negative("score.pursuer_destroyed", self.score.pursuer_destroyed)?;
        non_negative("score.near_miss", self.score.near_miss)?;
        at_most("effects.max_particles", self.effects.max_particles, MAX_PARTICLES)?;
        at_most(
            "effects.boost_trail_length",
            self.effects.boost_trail_length,
            MAX_TRAIL_LENGTH,
        )?;
        positive("effects.explosion_duration_ms", self.effects.explosion_duration_ms)?;
        positive("world.size", self.world.size)?;
        positive("world.viewport_width", self.world.viewport_width)?;
        positive("world.viewport_height", self.world.viewport_height)?;

        in_range("audio.master_volume", self.audio.master_volume, 0.0, 1.0)?;
        in_range("audio.sfx_volume", self.audio.sfx_volume, 0.0, 1.0)?;
        Ok(())
    }
}

/// Hard ceiling for `effects.max_particles`
pub const MAX_PARTICLES: usize = 8192;
/// Hard ceiling for `effects.boost_trail_length`
pub const MAX_TRAIL_LENGTH: usize = 256;

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field,
            value: value as f64,
        })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: f64::INFINITY,
        })
    }
}

fn at_most(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: 0.0,
            max: max as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_tier_table_rejected() {
        let mut config = GameConfig::default();
        config.difficulty.tiers.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyTierTable)));
    }

    #[test]
    fn test_first_tier_must_cover_zero() {
        let mut config = GameConfig::default();
        config.difficulty.tiers[0].time_ms = 1000.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FirstTierNotAtZero(t)) if t == 1000.0
        ));
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let mut config = GameConfig::default();
        config.difficulty.tiers[2].time_ms = 10_000.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnorderedTiers { index: 2, .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "score": { "near_miss": 40.0 } }"#).unwrap();
        assert_eq!(config.score.near_miss, 40.0);
        assert_eq!(config.score.survival_per_second, 10.0);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.difficulty.tiers.len(), 4);
    }

    #[test]
    fn test_json_with_empty_tiers_fails_validation() {
        let err = GameConfig::from_json(r#"{ "difficulty": { "tiers": [] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTierTable));
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_tiers() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        let parsed = GameConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_bad_volume_rejected() {
        let mut config = GameConfig::default();
        config.audio.sfx_volume = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "audio.sfx_volume", .. })
        ));
    }

    #[test]
    fn test_speed_ceiling() {
        let player = PlayerConfig::default();
        assert!((player.speed_ceiling() - 490.0).abs() < 1e-3);
    }

    #[test]
    fn test_negative_score_values_rejected() {
        let mut config = GameConfig::default();
        config.score.near_miss = -25.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "score.near_miss", .. })
        ));

        let mut config = GameConfig::default();
        config.score.survival_per_second = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_particle_cap_rejected() {
        let err = GameConfig::from_json(r#"{ "effects": { "max_particles": 18446744073709551615 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { field: "effects.max_particles", .. }
        ));

        let mut config = GameConfig::default();
        config.effects.max_particles = MAX_PARTICLES;
        assert!(config.validate().is_ok());
    }
}
