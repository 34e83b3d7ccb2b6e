//! Notifications emitted by the playback layer
//!
//! Components queue events internally; the owner drains them with
//! `take_events()` once per frame.

use crate::track::Track;

/// Playback notification
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// The system finished construction (fired once)
    Ready,
    /// A new track became active (detached copy)
    TrackChanged(Track),
    /// Music faded to silence and no track is active
    MusicCleared,
    /// Music volume changed (linear)
    MusicVolumeChanged(f32),
    /// Sound volume changed (linear)
    SoundVolumeChanged(f32),
}

impl AudioEvent {
    /// Name of the newly active track, if this is a track change
    pub fn track_name(&self) -> Option<&str> {
        match self {
            AudioEvent::TrackChanged(track) => Some(track.name.as_str()),
            _ => None,
        }
    }
}
