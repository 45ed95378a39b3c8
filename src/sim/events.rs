//! Events emitted by the simulation for audio, HUD and effects.
//!
//! The core never calls into presentation code. It queues typed events during
//! a tick and collaborators drain them afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Discrete gameplay events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Player boost engaged
    BoostActivated,
    /// A new pursuer entered the world
    PursuerSpawned { id: u32, position: Vec2 },
    /// Player rammed a pursuer
    PursuerDestroyed {
        id: u32,
        position: Vec2,
        points: f64,
        combo: u32,
    },
    /// Pursuer passed inside the near-miss band without touching
    NearMiss { id: u32, position: Vec2, points: f64 },
    /// Player overlapped an obstacle this frame
    ObstacleBump { position: Vec2 },
    /// Combo counter changed (increment or lapse)
    ComboChanged { combo: u32 },
    /// Difficulty tier advanced
    TierChanged { tier: usize },
    /// Run finished
    GameOver {
        score: u64,
        survival_ms: f64,
        kills: u32,
        new_high_score: bool,
    },
}

/// Named sound cues understood by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Boost,
    Explosion,
    Collision,
    NearMiss,
    Combo,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Boost => "boost",
            SoundCue::Explosion => "explosion",
            SoundCue::Collision => "collision",
            SoundCue::NearMiss => "nearMiss",
            SoundCue::Combo => "combo",
        }
    }

    /// Volume the cue is authored at, before master/sfx scaling
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundCue::Boost => 1.0,
            SoundCue::Explosion => 0.8,
            SoundCue::Collision => 0.5,
            SoundCue::NearMiss => 0.4,
            SoundCue::Combo => 0.6,
        }
    }
}

impl GameEvent {
    /// Sound cues this event should trigger
    pub fn sound_cues(&self) -> &'static [SoundCue] {
        match self {
            GameEvent::BoostActivated => &[SoundCue::Boost],
            GameEvent::PursuerDestroyed { .. } => &[SoundCue::Explosion, SoundCue::Combo],
            GameEvent::NearMiss { .. } => &[SoundCue::NearMiss],
            GameEvent::ObstacleBump { .. } => &[SoundCue::Collision],
            _ => &[],
        }
    }
}

/// Outbound event queue, filled during a tick and drained by collaborators
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Peek at queued events without draining
    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Take all queued events
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
