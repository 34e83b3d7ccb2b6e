//! Mixer surface
//!
//! [`MixerBackend`] is the named-parameter / snapshot interface of whatever
//! mixer sits behind the playback layer. [`MixerControl`] maps linear
//! volumes onto attenuation parameters and guards snapshot transitions.

use crate::config::AudioConfig;
use crate::context::AudioContext;
use crate::events::AudioEvent;
use crate::{AudioError, AudioResult};
use std::collections::{HashMap, HashSet};

/// Stand-in for silence, since zero has no decibel value (-60 dB)
pub const MIN_LINEAR_VOLUME: f32 = 0.001;

/// Replace non-positive (or NaN) volumes with [`MIN_LINEAR_VOLUME`]
#[inline]
pub fn floor_volume(volume: f32) -> f32 {
    if volume > 0.0 { volume } else { MIN_LINEAR_VOLUME }
}

/// Convert linear gain to decibels, flooring non-positive input
#[inline]
pub fn linear_to_db(volume: f32) -> f32 {
    20.0 * floor_volume(volume).log10()
}

// ═══════════════════════════════════════════════════════════════════════════════
// BACKEND
// ═══════════════════════════════════════════════════════════════════════════════

/// Named-parameter mixer
pub trait MixerBackend {
    fn set_parameter(&mut self, name: &str, value: f32);

    fn parameter(&self, name: &str) -> Option<f32>;

    /// Blend to a snapshot over `duration_secs`
    fn transition_to_snapshot(&mut self, name: &str, duration_secs: f32);
}

/// In-memory mixer that stores parameters and records snapshot transitions
#[derive(Debug, Default, Clone)]
pub struct VirtualMixer {
    parameters: HashMap<String, f32>,
    transitions: Vec<(String, f32)>,
}

impl VirtualMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot transitions requested so far (name, duration)
    pub fn transitions(&self) -> &[(String, f32)] {
        &self.transitions
    }
}

impl MixerBackend for VirtualMixer {
    fn set_parameter(&mut self, name: &str, value: f32) {
        self.parameters.insert(name.to_string(), value);
    }

    fn parameter(&self, name: &str) -> Option<f32> {
        self.parameters.get(name).copied()
    }

    fn transition_to_snapshot(&mut self, name: &str, duration_secs: f32) {
        self.transitions.push((name.to_string(), duration_secs));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MIXER CONTROL
// ═══════════════════════════════════════════════════════════════════════════════

/// Volume and snapshot control on top of a [`MixerBackend`]
pub struct MixerControl<M: MixerBackend> {
    backend: M,
    context: AudioContext,
    music_param: String,
    sound_param: String,
    pitch_param: String,
    snapshots: HashSet<String>,
    pending_events: Vec<AudioEvent>,
}

impl<M: MixerBackend> MixerControl<M> {
    /// Create and apply the context's current volumes to the mixer
    pub fn new(mut backend: M, config: &AudioConfig, context: AudioContext) -> Self {
        backend.set_parameter(&config.music_attenuation_param, linear_to_db(context.music_volume()));
        backend.set_parameter(&config.sound_attenuation_param, linear_to_db(context.sound_volume()));

        Self {
            backend,
            context,
            music_param: config.music_attenuation_param.clone(),
            sound_param: config.sound_attenuation_param.clone(),
            pitch_param: config.sound_pitch_param.clone(),
            snapshots: config.snapshots.iter().cloned().collect(),
            pending_events: Vec::new(),
        }
    }

    /// Set music volume (linear)
    ///
    /// Non-positive values are stored as [`MIN_LINEAR_VOLUME`]; the event
    /// carries the value as given.
    pub fn set_music_volume(&mut self, volume: f32) {
        let stored = floor_volume(volume);
        self.context.set_music_volume(stored);
        self.backend.set_parameter(&self.music_param, linear_to_db(stored));
        self.pending_events.push(AudioEvent::MusicVolumeChanged(volume));
    }

    /// Set sound volume (linear), floored like [`set_music_volume`](Self::set_music_volume)
    pub fn set_sound_volume(&mut self, volume: f32) {
        let stored = floor_volume(volume);
        self.context.set_sound_volume(stored);
        self.backend.set_parameter(&self.sound_param, linear_to_db(stored));
        self.pending_events.push(AudioEvent::SoundVolumeChanged(volume));
    }

    pub fn music_volume(&self) -> f32 {
        self.context.music_volume()
    }

    pub fn sound_volume(&self) -> f32 {
        self.context.sound_volume()
    }

    /// Transition to a registered snapshot
    ///
    /// Unregistered names are logged and ignored.
    pub fn transition_to_snapshot(&mut self, name: &str, duration_secs: f32) {
        if let Err(e) = self.try_transition_to_snapshot(name, duration_secs) {
            log::error!("[MixerControl] {}", e);
        }
    }

    fn try_transition_to_snapshot(&mut self, name: &str, duration_secs: f32) -> AudioResult<()> {
        if !self.snapshots.contains(name) {
            return Err(AudioError::UnknownSnapshot(name.to_string()));
        }
        self.backend.transition_to_snapshot(name, duration_secs.max(0.0));
        Ok(())
    }

    /// Whether a snapshot name is registered
    pub fn has_snapshot(&self, name: &str) -> bool {
        self.snapshots.contains(name)
    }

    /// Current global sound pitch (1.0 if never set)
    pub fn sound_pitch(&self) -> f32 {
        self.backend.parameter(&self.pitch_param).unwrap_or(1.0)
    }

    /// Write the global sound pitch parameter
    pub fn set_sound_pitch(&mut self, pitch: f32) {
        self.backend.set_parameter(&self.pitch_param, pitch);
    }

    /// Drain pending volume notifications
    pub fn take_events(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn backend(&self) -> &M {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut M {
        &mut self.backend
    }
}
