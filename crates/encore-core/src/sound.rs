//! Sound-effect definitions

use crate::clip::AudioClip;
use serde::{Deserialize, Serialize};

/// Static configuration of one sound effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDefinition {
    /// Unique name (lookup key)
    pub name: String,
    /// Source audio
    pub clip: AudioClip,
    /// Mixer group the sound is routed to
    #[serde(default)]
    pub output: Option<String>,
    /// Playback volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Pitch used when no override or fluctuation applies
    #[serde(default = "default_pitch")]
    pub base_pitch: f32,
    /// Random pitch spread around `base_pitch` (0 = none)
    #[serde(default)]
    pub pitch_fluctuation: f32,
    /// Loop the clip once started
    #[serde(default)]
    pub looping: bool,
    /// Fire-and-forget playback that may overlap itself
    #[serde(default)]
    pub one_shot: bool,
    /// Allow playback while the game is paused
    #[serde(default)]
    pub play_while_paused: bool,
}

fn default_volume() -> f32 {
    1.0
}
fn default_pitch() -> f32 {
    1.0
}

impl SoundDefinition {
    /// Create a definition with default settings
    pub fn new(name: impl Into<String>, clip: AudioClip) -> Self {
        Self {
            name: name.into(),
            clip,
            output: None,
            volume: 1.0,
            base_pitch: 1.0,
            pitch_fluctuation: 0.0,
            looping: false,
            one_shot: false,
            play_while_paused: false,
        }
    }

    /// Mark as a one-shot sound
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    /// Mark as looping
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Allow playback while paused
    pub fn play_while_paused(mut self) -> Self {
        self.play_while_paused = true;
        self
    }

    /// Set base pitch and fluctuation range
    pub fn with_pitch(mut self, base_pitch: f32, fluctuation: f32) -> Self {
        self.base_pitch = base_pitch;
        self.pitch_fluctuation = fluctuation;
        self
    }

    /// Route to a mixer group
    pub fn with_output(mut self, group: impl Into<String>) -> Self {
        self.output = Some(group.into());
        self
    }

    /// Set playback volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Whether a random pitch has to be rolled per play
    #[inline]
    pub fn has_fluctuation(&self) -> bool {
        self.pitch_fluctuation != 0.0
    }
}
