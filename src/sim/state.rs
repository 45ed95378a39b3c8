//! Game state: owns every entity collection and subsystem for one run

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionResolver;
use super::effects::EffectsBus;
use super::events::{EventQueue, GameEvent};
use super::obstacle::{Obstacle, scatter};
use super::player::PlayerVehicle;
use super::pursuer::Pursuer;
use super::score::ScoreEngine;
use super::snapshot::{FrameSnapshot, HudState, PlayerPose, PursuerPose};
use super::spawn::SpawnScheduler;
use crate::config::{ConfigError, GameConfig};
use crate::format_time;
use crate::highscores::HighScoreStore;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Run ended; the state is frozen until `restart`
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Milliseconds survived this run (paused time excluded)
    pub survival_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pursuers destroyed this run
    pub kills: u32,
    pub high_score: u64,
    pub player: PlayerVehicle,
    /// Live and still-animating pursuers, in spawn order
    pub pursuers: Vec<Pursuer>,
    pub obstacles: Vec<Obstacle>,
    pub spawner: SpawnScheduler,
    pub score: ScoreEngine,
    pub effects: EffectsBus,
    pub resolver: CollisionResolver,
    pub events: EventQueue,
}

impl GameState {
    /// Validate `config` and set up a fresh run
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let start = config.world.start_position();
        let obstacles = scatter(&config.obstacles, start, config.world.size, &mut rng);

        let mut state = Self {
            player: PlayerVehicle::new(start, config.collision.player_radius, config.player),
            spawner: SpawnScheduler::new(&config)?,
            score: ScoreEngine::new(config.score),
            effects: EffectsBus::new(config.effects),
            resolver: CollisionResolver::new(&config),
            seed,
            rng,
            phase: GamePhase::Playing,
            survival_ms: 0.0,
            time_ticks: 0,
            kills: 0,
            high_score: 0,
            pursuers: Vec::new(),
            obstacles,
            events: EventQueue::new(),
            config,
        };
        state.spawn_initial_pursuers();

        log::info!(
            "New run (seed {}): {} obstacles, {} pursuers",
            seed,
            state.obstacles.len(),
            state.pursuers.len()
        );
        Ok(state)
    }

    /// Seed the best score shown on the HUD (read from a store at startup)
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    fn spawn_initial_pursuers(&mut self) {
        let start = self.player.position;
        for _ in 0..self.config.pursuer.initial_count {
            let pursuer = self.spawner.spawn(start, &mut self.rng);
            self.push_pursuer(pursuer);
        }
    }

    pub(crate) fn push_pursuer(&mut self, pursuer: Pursuer) {
        self.events.push(GameEvent::PursuerSpawned {
            id: pursuer.id,
            position: pursuer.position,
        });
        self.pursuers.push(pursuer);
    }

    /// Start over. The obstacle field and RNG stream carry on.
    ///
    /// Undrained events (such as the `GameOver` from `end_run`) stay queued
    /// ahead of the new run's spawn events.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.survival_ms = 0.0;
        self.time_ticks = 0;
        self.kills = 0;
        self.player.reset(self.config.world.start_position());
        self.pursuers.clear();
        self.spawner.reset();
        self.score.reset();
        self.effects.reset();
        self.spawn_initial_pursuers();
        log::info!("Run restarted");
    }

    /// Finish the run: record the score and emit `GameOver`.
    ///
    /// Store failures are logged and treated as "no new best". Returns true on
    /// a new high score. Calling this on a finished run does nothing.
    pub fn end_run(&mut self, store: &mut dyn HighScoreStore) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;

        let new_high_score = match self.score.finalize_run(store) {
            Ok(beaten) => beaten,
            Err(e) => {
                log::warn!("Could not save high score: {}", e);
                false
            }
        };
        let score = self.score.score();
        if new_high_score || score > self.high_score {
            self.high_score = score;
        }

        self.events.push(GameEvent::GameOver {
            score,
            survival_ms: self.survival_ms,
            kills: self.kills,
            new_high_score,
        });
        log::info!(
            "Game over: score {} in {} with {} kills",
            score,
            format_time(self.survival_ms),
            self.kills
        );
        new_high_score
    }

    /// Hand queued events to collaborators
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn active_pursuers(&self) -> usize {
        self.pursuers.iter().filter(|p| p.is_active()).count()
    }

    pub fn hud(&self) -> HudState {
        HudState {
            score: self.score.score(),
            high_score: self.high_score.max(self.score.score()),
            survival_ms: self.survival_ms,
            time_text: format_time(self.survival_ms),
            combo: self.score.combo(),
            boost_cooldown: self.player.boost_cooldown_progress(),
            boost_ready: self.player.boost_ready(),
            kills: self.kills,
            near_misses: self.score.near_misses(),
            tier: self.spawner.tier_index(),
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let camera = self.player.position;
        let viewport = self.config.world.viewport();
        let margin = self.config.world.offscreen_margin;

        FrameSnapshot {
            phase: self.phase,
            camera,
            shake_offset: self.effects.shake_offset(),
            player: PlayerPose {
                position: self.player.position,
                angle: self.player.angle,
                speed: self.player.speed,
                boosting: self.player.is_boosting(),
            },
            pursuers: self
                .pursuers
                .iter()
                .map(|p| PursuerPose {
                    id: p.id,
                    position: p.position,
                    angle: p.angle,
                    destroyed: p.destroyed_elapsed(),
                    off_screen: p.is_off_screen(camera, viewport, margin),
                })
                .collect(),
            obstacles: self.obstacles.clone(),
            particles: self.effects.particles.clone(),
            trail: self.effects.trail.clone(),
            hud: self.hud(),
        }
    }
}
