//! Score accumulation, kill combos and the best-score handoff

use serde::{Deserialize, Serialize};

use crate::config::ScoreConfig;
use crate::highscores::{HighScoreStore, StoreError, load_or_zero};

/// Running score for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEngine {
    score: f64,
    /// Consecutive kills inside the combo window
    combo: u32,
    /// Remaining combo window (ms); positive exactly when `combo > 0`
    combo_timer_ms: f64,
    near_misses: u32,
    config: ScoreConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            score: 0.0,
            combo: 0,
            combo_timer_ms: 0.0,
            near_misses: 0,
            config,
        }
    }

    /// Survival points and combo decay. Returns true if the combo lapsed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let dt = f64::from(dt);
        self.score += self.config.survival_per_second * dt;

        if self.combo > 0 {
            self.combo_timer_ms -= dt * 1000.0;
            if self.combo_timer_ms <= 0.0 {
                self.reset_combo();
                return true;
            }
        }
        false
    }

    /// Score a kill at the current combo, then extend the combo. Returns points.
    pub fn on_kill(&mut self) -> f64 {
        let points =
            self.config.pursuer_destroyed * (1.0 + f64::from(self.combo) * self.config.kill_combo_bonus);
        self.score += points;
        self.combo += 1;
        self.combo_timer_ms = self.config.combo_timeout_ms;
        points
    }

    /// Score a near miss at the current combo. Leaves the combo untouched.
    pub fn on_near_miss(&mut self) -> f64 {
        let points =
            self.config.near_miss * (1.0 + f64::from(self.combo) * self.config.near_miss_combo_bonus);
        self.score += points;
        self.near_misses += 1;
        points
    }

    fn reset_combo(&mut self) {
        self.combo = 0;
        self.combo_timer_ms = 0.0;
    }

    /// Whole points
    pub fn score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn raw_score(&self) -> f64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn combo_timer_ms(&self) -> f64 {
        self.combo_timer_ms
    }

    pub fn near_misses(&self) -> u32 {
        self.near_misses
    }

    /// Record the run against the stored best. Returns true on a new best.
    pub fn finalize_run(&self, store: &mut dyn HighScoreStore) -> Result<bool, StoreError> {
        let score = self.score();
        // An unreadable record counts as 0 so the save below can replace it
        let best = load_or_zero(store);
        if score > best {
            store.save(score)?;
            log::info!("New high score {} (previous {})", score, best);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn reset(&mut self) {
        self.score = 0.0;
        self.near_misses = 0;
        self.reset_combo();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;

    fn engine() -> ScoreEngine {
        ScoreEngine::new(ScoreConfig::default())
    }

    #[test]
    fn test_survival_only_score() {
        let mut s = engine();
        for _ in 0..600 {
            s.tick(1.0 / 60.0);
        }
        assert!((s.raw_score() - 100.0).abs() < 1e-3);
        assert_eq!(s.combo(), 0);
    }

    #[test]
    fn test_kill_combo_multiplier() {
        let mut s = engine();
        assert!((s.on_kill() - 100.0).abs() < 1e-9);
        assert!((s.on_kill() - 120.0).abs() < 1e-9);
        assert!((s.on_kill() - 140.0).abs() < 1e-9);
        assert_eq!(s.combo(), 3);
        assert_eq!(s.score(), 360);
    }

    #[test]
    fn test_near_miss_reads_but_keeps_combo() {
        let mut s = engine();
        assert!((s.on_near_miss() - 25.0).abs() < 1e-9);
        assert_eq!(s.combo(), 0);
        assert_eq!(s.combo_timer_ms(), 0.0);

        s.on_kill();
        s.on_kill();
        s.tick(1.0);
        let timer_before = s.combo_timer_ms();
        // combo 2: 25 * 1.2
        assert!((s.on_near_miss() - 30.0).abs() < 1e-9);
        assert_eq!(s.combo(), 2);
        assert_eq!(s.combo_timer_ms(), timer_before);
        assert_eq!(s.near_misses(), 2);
    }

    #[test]
    fn test_combo_decay_window() {
        let mut s = engine();
        s.on_kill();
        assert!(!s.tick(2.999));
        assert!(s.combo() > 0);
        assert!(s.combo_timer_ms() > 0.0);

        assert!(s.tick(0.002));
        assert_eq!(s.combo(), 0);
        assert_eq!(s.combo_timer_ms(), 0.0);
    }

    #[test]
    fn test_kill_refreshes_window() {
        let mut s = engine();
        s.on_kill();
        s.tick(2.5);
        s.on_kill();
        s.tick(2.5);
        assert_eq!(s.combo(), 2);
    }

    #[test]
    fn test_finalize_updates_store_only_when_beaten() {
        let mut store = MemoryStore::with_score(500);
        let mut s = engine();
        s.tick(10.0); // 100 points
        assert!(!s.finalize_run(&mut store).unwrap());
        assert_eq!(store.load().unwrap(), 500);

        for _ in 0..5 {
            s.on_kill();
        }
        assert!(s.finalize_run(&mut store).unwrap());
        assert_eq!(store.load().unwrap(), s.score());
    }

    #[test]
    fn test_finalize_compares_floored_score() {
        let mut store = MemoryStore::with_score(100);
        let mut s = engine();
        s.tick(10.05); // 100.5 points floors to 100
        assert!(!s.finalize_run(&mut store).unwrap());
    }

    #[test]
    fn test_reset() {
        let mut s = engine();
        s.on_kill();
        s.on_near_miss();
        s.reset();
        assert_eq!(s.score(), 0);
        assert_eq!(s.combo(), 0);
        assert_eq!(s.near_misses(), 0);
    }

    struct UnreadableStore {
        saved: Option<u64>,
    }

    impl HighScoreStore for UnreadableStore {
        fn load(&self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("corrupt record".into()))
        }

        fn save(&mut self, score: u64) -> Result<(), StoreError> {
            self.saved = Some(score);
            Ok(())
        }
    }

    #[test]
    fn test_finalize_overwrites_unreadable_record() {
        let mut store = UnreadableStore { saved: None };
        let mut s = engine();
        s.on_kill();
        assert!(s.finalize_run(&mut store).unwrap());
        assert_eq!(store.saved, Some(100));
    }
}
