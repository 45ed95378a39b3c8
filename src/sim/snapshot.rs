//! Read-only views of the game handed to renderers and the HUD

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{Particle, TrailPoint};
use super::obstacle::Obstacle;
use super::state::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub position: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub boosting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuerPose {
    pub id: u32,
    pub position: Vec2,
    pub angle: f32,
    /// Seconds into the wreck animation, if destroyed
    pub destroyed: Option<f32>,
    /// Outside the viewport plus margin; renderers may cull it
    pub off_screen: bool,
}

/// HUD numbers for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudState {
    pub score: u64,
    pub high_score: u64,
    pub survival_ms: f64,
    /// `M:SS`
    pub time_text: String,
    pub combo: u32,
    /// 0 = ready, 1 = just used
    pub boost_cooldown: f32,
    pub boost_ready: bool,
    pub kills: u32,
    pub near_misses: u32,
    pub tier: usize,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    /// World point drawn at the viewport center
    pub camera: Vec2,
    pub shake_offset: Vec2,
    pub player: PlayerPose,
    pub pursuers: Vec<PursuerPose>,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    pub trail: Vec<TrailPoint>,
    pub hud: HudState,
}
