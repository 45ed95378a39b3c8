//! Audio cue mixing
//!
//! The simulation only emits `GameEvent`s. This module turns them into named
//! cues with a final volume and hands them to whatever backend the host
//! provides (Web Audio, a native mixer, or nothing at all).

use crate::config::AudioConfig;
use crate::sim::{GameEvent, SoundCue};

/// A cue ready to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub cue: SoundCue,
    /// Final gain after master/sfx scaling (0.0 - 1.0)
    pub volume: f32,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        self.cue.name()
    }
}

/// Playback backend. Failures stay inside the sink.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Sink that drops everything (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Volume settings and event-to-cue mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(&AudioConfig::default())
    }
}

impl AudioMixer {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            master_volume: config.master_volume.clamp(0.0, 1.0),
            sfx_volume: config.sfx_volume.clamp(0.0, 1.0),
            muted: config.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Scale a cue; `None` when it would be silent
    pub fn mix(&self, cue: SoundCue) -> Option<AudioCue> {
        let volume = cue.base_volume() * self.effective_volume();
        (volume > 0.0).then_some(AudioCue { cue, volume })
    }

    /// Cues for a batch of drained events, in event order
    pub fn cues_for(&self, events: &[GameEvent]) -> Vec<AudioCue> {
        events
            .iter()
            .flat_map(|e| e.sound_cues().iter())
            .filter_map(|cue| self.mix(*cue))
            .collect()
    }

    /// Mix and play a batch of events
    pub fn dispatch(&self, events: &[GameEvent], sink: &mut dyn AudioSink) -> usize {
        let cues = self.cues_for(events);
        let count = cues.len();
        for cue in cues {
            sink.play(cue);
        }
        count
    }
}
