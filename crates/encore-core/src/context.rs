//! Shared audio settings
//!
//! One [`AudioContext`] is created per audio system and cloned into every component that needs the pause state or the last
//! applied volumes. Clones share the same state.

use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ContextState {
    time_scale: f32,
    music_volume: f32,
    sound_volume: f32,
}

/// Cloneable handle to shared audio settings
#[derive(Debug, Clone)]
pub struct AudioContext {
    state: Arc<RwLock<ContextState>>,
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioContext {
    pub fn new() -> Self {
        Self::with_volumes(1.0, 1.0)
    }

    /// Create with initial linear volumes
    pub fn with_volumes(music_volume: f32, sound_volume: f32) -> Self {
        Self {
            state: Arc::new(RwLock::new(ContextState {
                time_scale: 1.0,
                music_volume,
                sound_volume,
            })),
        }
    }

    /// Game time scale (0 = paused)
    pub fn time_scale(&self) -> f32 {
        self.state.read().time_scale
    }

    pub fn set_time_scale(&self, time_scale: f32) {
        self.state.write().time_scale = time_scale.max(0.0);
    }

    /// True while the time scale is zero
    pub fn is_paused(&self) -> bool {
        self.state.read().time_scale == 0.0
    }

    /// Last applied music volume (linear)
    pub fn music_volume(&self) -> f32 {
        self.state.read().music_volume
    }

    pub fn set_music_volume(&self, volume: f32) {
        self.state.write().music_volume = volume;
    }

    /// Last applied sound volume (linear)
    pub fn sound_volume(&self) -> f32 {
        self.state.read().sound_volume
    }

    pub fn set_sound_volume(&self, volume: f32) {
        self.state.write().sound_volume = volume;
    }
}
