//! Difficulty-tiered pursuer spawning

use glam::Vec2;
use rand::Rng;

use super::pursuer::Pursuer;
use crate::config::{ConfigError, DifficultyTier, GameConfig, PursuerConfig};
use crate::random_point_on_ring;

/// Last tier whose threshold has been reached; falls back to the first tier
pub fn select_tier(tiers: &[DifficultyTier], survival_ms: f64) -> Option<(usize, &DifficultyTier)> {
    tiers
        .iter()
        .enumerate()
        .rev()
        .find(|(_, tier)| tier.time_ms <= survival_ms)
        .or_else(|| tiers.first().map(|t| (0, t)))
}

/// Spawns pursuers on a timer, gated by the current tier's population cap
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    tiers: Vec<DifficultyTier>,
    pursuer: PursuerConfig,
    pursuer_radius: f32,
    /// Accumulated time since the last spawn check (ms)
    timer_ms: f32,
    tier_index: usize,
    tier: DifficultyTier,
    next_id: u32,
}

impl SpawnScheduler {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let tiers = config.difficulty.tiers.clone();
        let tier = *tiers.first().ok_or(ConfigError::EmptyTierTable)?;
        Ok(Self {
            tiers,
            pursuer: config.pursuer,
            pursuer_radius: config.collision.pursuer_radius,
            timer_ms: 0.0,
            tier_index: 0,
            tier,
            next_id: 1,
        })
    }

    /// Advance the timer; returns a new pursuer when one is due and allowed
    pub fn update(
        &mut self,
        dt: f32,
        pursuers: &[Pursuer],
        survival_ms: f64,
        player_position: Vec2,
        rng: &mut impl Rng,
    ) -> Option<Pursuer> {
        self.update_difficulty(survival_ms);

        self.timer_ms += dt * 1000.0;
        if self.timer_ms < self.tier.spawn_interval_ms {
            return None;
        }
        self.timer_ms = 0.0;

        let active = pursuers.iter().filter(|p| p.is_active()).count();
        if active >= self.tier.max_pursuers {
            log::trace!("Spawn skipped: {} of {} pursuers active", active, self.tier.max_pursuers);
            return None;
        }

        Some(self.spawn(player_position, rng))
    }

    fn update_difficulty(&mut self, survival_ms: f64) {
        if let Some((index, tier)) = select_tier(&self.tiers, survival_ms) {
            if index != self.tier_index {
                log::info!(
                    "Difficulty tier {} at {:.1}s: max {} pursuers, speed x{:.2}, every {}ms",
                    index,
                    survival_ms / 1000.0,
                    tier.max_pursuers,
                    tier.speed_multiplier,
                    tier.spawn_interval_ms
                );
            }
            self.tier_index = index;
            self.tier = *tier;
        }
    }

    /// Place a pursuer on the spawn ring around the player
    pub fn spawn(&mut self, player_position: Vec2, rng: &mut impl Rng) -> Pursuer {
        let id = self.next_id;
        self.next_id += 1;
        let position = random_point_on_ring(rng, player_position, self.pursuer.spawn_distance);
        let pursuer = Pursuer::spawn(
            id,
            position,
            self.pursuer_radius,
            self.tier.speed_multiplier,
            &self.pursuer,
            rng,
        );
        log::debug!("Spawned pursuer {} at ({:.0}, {:.0}) speed {:.1}", id, position.x, position.y, pursuer.speed);
        pursuer
    }

    pub fn tier(&self) -> &DifficultyTier {
        &self.tier
    }

    pub fn tier_index(&self) -> usize {
        self.tier_index
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    /// Back to the first tier with an empty timer
    pub fn reset(&mut self) {
        self.timer_ms = 0.0;
        self.tier_index = 0;
        if let Some(first) = self.tiers.first() {
            self.tier = *first;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn two_tier_config() -> GameConfig {
        GameConfig {
            difficulty: DifficultyConfig {
                tiers: vec![
                    DifficultyTier::new(0.0, 2, 0.85, 5000.0),
                    DifficultyTier::new(30_000.0, 3, 0.90, 4000.0),
                ],
            },
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_tier_selection_boundary() {
        let config = two_tier_config();
        let tiers = &config.difficulty.tiers;

        let (index, tier) = select_tier(tiers, 29_999.0).unwrap();
        assert_eq!(index, 0);
        assert_eq!(tier.max_pursuers, 2);
        assert_eq!(tier.speed_multiplier, 0.85);
        assert_eq!(tier.spawn_interval_ms, 5000.0);

        let (index, tier) = select_tier(tiers, 30_000.0).unwrap();
        assert_eq!(index, 1);
        assert_eq!(tier.max_pursuers, 3);
        assert_eq!(tier.speed_multiplier, 0.90);
        assert_eq!(tier.spawn_interval_ms, 4000.0);
    }

    #[test]
    fn test_select_tier_empty_table() {
        assert!(select_tier(&[], 1000.0).is_none());
    }

    #[test]
    fn test_empty_table_rejected_at_construction() {
        let mut config = GameConfig::default();
        config.difficulty.tiers.clear();
        assert!(matches!(SpawnScheduler::new(&config), Err(ConfigError::EmptyTierTable)));
    }

    #[test]
    fn test_spawn_gated_by_population() {
        let config = two_tier_config();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut scheduler = SpawnScheduler::new(&config).unwrap();
        let mut pursuers = vec![
            scheduler.spawn(Vec2::ZERO, &mut rng),
            scheduler.spawn(Vec2::ZERO, &mut rng),
        ];

        // Timer elapses but the population is full
        assert!(scheduler.update(5.0, &pursuers, 0.0, Vec2::ZERO, &mut rng).is_none());
        assert_eq!(scheduler.timer_ms(), 0.0);

        // One wrecked pursuer frees a slot for the next elapsed interval
        pursuers[0].destroy();
        assert!(scheduler.update(2.5, &pursuers, 0.0, Vec2::ZERO, &mut rng).is_none());
        let spawned = scheduler.update(2.5, &pursuers, 0.0, Vec2::ZERO, &mut rng);
        assert!(spawned.is_some());
    }

    #[test]
    fn test_spawn_on_ring_with_tier_speed() {
        let config = two_tier_config();
        let mut rng = Pcg32::seed_from_u64(22);
        let mut scheduler = SpawnScheduler::new(&config).unwrap();
        let player = Vec2::new(640.0, 360.0);

        let p = scheduler
            .update(4.0, &[], 31_000.0, player, &mut rng)
            .expect("tier 2 interval is 4s");
        assert!((p.position.distance(player) - 600.0).abs() < 0.01);
        assert!(p.speed >= 190.0 * 0.9 - 1e-3 && p.speed <= 250.0 * 0.9 + 1e-3);
        assert_eq!(scheduler.tier_index(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(23);
        let mut scheduler = SpawnScheduler::new(&config).unwrap();
        let a = scheduler.spawn(Vec2::ZERO, &mut rng);
        let b = scheduler.spawn(Vec2::ZERO, &mut rng);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_reset_returns_to_first_tier() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(24);
        let mut scheduler = SpawnScheduler::new(&config).unwrap();
        scheduler.update(1.0, &[], 130_000.0, Vec2::ZERO, &mut rng);
        assert_eq!(scheduler.tier_index(), 3);
        assert_eq!(scheduler.tier().max_pursuers, 5);

        scheduler.reset();
        assert_eq!(scheduler.tier_index(), 0);
        assert_eq!(scheduler.timer_ms(), 0.0);
    }
}
