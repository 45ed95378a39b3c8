//! Simulation core
//!
//! All gameplay logic lives here. This module has no rendering, audio or
//! platform dependencies:
//! - One `tick` per frame with a clamped delta time
//! - Seeded RNG only
//! - Stable iteration order (pursuers in spawn order)
//! - Outbound events instead of calls into presentation code

pub mod collision;
pub mod effects;
pub mod events;
pub mod obstacle;
pub mod player;
pub mod pursuer;
pub mod score;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod strategy;
pub mod tick;

pub use collision::{CollisionResolver, Contact, circles_overlap};
pub use effects::{EffectsBus, Particle, ParticleKind, TrailPoint};
pub use events::{EventQueue, GameEvent, SoundCue};
pub use obstacle::{Obstacle, ObstacleKind, scatter};
pub use player::{BoostState, Bounds, PlayerVehicle, PlayerView};
pub use pursuer::{Pursuer, PursuerState, PursuerView, Separation, separation};
pub use score::ScoreEngine;
pub use snapshot::{FrameSnapshot, HudState, PlayerPose, PursuerPose};
pub use spawn::{SpawnScheduler, select_tier};
pub use state::{GamePhase, GameState};
pub use strategy::{
    Adaptive, Behavior, Flanking, PredictivePursuit, TargetingStrategy, classify_behavior,
    optimal_speed,
};
pub use tick::{TickInput, clamp_dt, tick};
