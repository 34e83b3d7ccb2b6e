//! Audio system configuration

use crate::AudioResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default mixer parameter for music attenuation (dB)
pub const DEFAULT_MUSIC_ATTENUATION_PARAM: &str = "MusicAttenuation";
/// Default mixer parameter for sound attenuation (dB)
pub const DEFAULT_SOUND_ATTENUATION_PARAM: &str = "SoundAttenuation";
/// Default mixer parameter for the global sound pitch
pub const DEFAULT_SOUND_PITCH_PARAM: &str = "SoundPitch";
/// Default command queue capacity
pub const DEFAULT_COMMAND_QUEUE_CAPACITY: usize = 1024;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Mixer parameter receiving the music attenuation
    #[serde(default = "default_music_param")]
    pub music_attenuation_param: String,
    /// Mixer parameter receiving the sound attenuation
    #[serde(default = "default_sound_param")]
    pub sound_attenuation_param: String,
    /// Mixer parameter driven by sound pitch ramps
    #[serde(default = "default_pitch_param")]
    pub sound_pitch_param: String,
    /// Mixer snapshots that may be transitioned to
    #[serde(default)]
    pub snapshots: Vec<String>,
    /// Initial music volume (linear)
    #[serde(default = "default_volume")]
    pub music_volume: f32,
    /// Initial sound volume (linear)
    #[serde(default = "default_volume")]
    pub sound_volume: f32,
    /// Capacity of the handle command ring buffer
    #[serde(default = "default_capacity")]
    pub command_queue_capacity: usize,
    /// Seed for sound pitch randomization (None = seed from the OS)
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_music_param() -> String {
    DEFAULT_MUSIC_ATTENUATION_PARAM.to_string()
}
fn default_sound_param() -> String {
    DEFAULT_SOUND_ATTENUATION_PARAM.to_string()
}
fn default_pitch_param() -> String {
    DEFAULT_SOUND_PITCH_PARAM.to_string()
}
fn default_volume() -> f32 {
    1.0
}
fn default_capacity() -> usize {
    DEFAULT_COMMAND_QUEUE_CAPACITY
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_attenuation_param: default_music_param(),
            sound_attenuation_param: default_sound_param(),
            sound_pitch_param: default_pitch_param(),
            snapshots: Vec::new(),
            music_volume: 1.0,
            sound_volume: 1.0,
            command_queue_capacity: DEFAULT_COMMAND_QUEUE_CAPACITY,
            rng_seed: None,
        }
    }
}

impl AudioConfig {
    /// Set a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Register a mixer snapshot name
    pub fn with_snapshot(mut self, name: impl Into<String>) -> Self {
        self.snapshots.push(name.into());
        self
    }

    pub fn from_json(json: &str) -> AudioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> AudioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> AudioResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (field, name) in [
            ("music_attenuation_param", &self.music_attenuation_param),
            ("sound_attenuation_param", &self.sound_attenuation_param),
            ("sound_pitch_param", &self.sound_pitch_param),
        ] {
            if name.is_empty() {
                errors.push(format!("{} must not be empty", field));
            }
        }
        if self.command_queue_capacity == 0 {
            errors.push("command_queue_capacity must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            errors.push(format!("music_volume {} out of range 0..=1", self.music_volume));
        }
        if !(0.0..=1.0).contains(&self.sound_volume) {
            errors.push(format!("sound_volume {} out of range 0..=1", self.sound_volume));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
