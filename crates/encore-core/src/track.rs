//! Music tracks and the track registry
//!
//! A [`Track`] is one piece of background music together with the position
//! it should resume from. The [`TrackRegistry`] keeps tracks in catalog
//! order and answers lookups by name.

use crate::clip::AudioClip;
use crate::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════════════
// TRACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Display metadata for a track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Cover art asset key
    #[serde(default)]
    pub cover_art: Option<String>,
    /// Artist / composer credit
    #[serde(default)]
    pub artist: Option<String>,
}

/// Background music track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique name (lookup key)
    pub name: String,
    /// Source audio
    pub clip: AudioClip,
    /// Display metadata
    #[serde(default)]
    pub metadata: TrackMetadata,
    /// Per-track volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Primary sort key for authoring order
    #[serde(default)]
    pub track_number: i32,
    /// Last resume position in seconds, always in `[0, length)`
    #[serde(skip)]
    resume_position: f32,
}

fn default_volume() -> f32 {
    1.0
}

impl Track {
    /// Create a new track
    pub fn new(name: impl Into<String>, clip: AudioClip) -> Self {
        Self {
            name: name.into(),
            clip,
            metadata: TrackMetadata::default(),
            volume: 1.0,
            track_number: 0,
            resume_position: 0.0,
        }
    }

    /// Set the authoring track number
    pub fn with_track_number(mut self, track_number: i32) -> Self {
        self.track_number = track_number;
        self
    }

    /// Track length in seconds
    #[inline]
    pub fn length_secs(&self) -> f32 {
        self.clip.length_secs
    }

    /// Position playback resumes from when a request asks to resume
    #[inline]
    pub fn resume_position(&self) -> f32 {
        self.resume_position
    }

    /// Store a resume position, wrapping it into `[0, length)`
    ///
    /// Values past the end wrap around by the track length. Negative or
    /// non-finite values store 0.
    pub fn set_resume_position(&mut self, position_secs: f32) {
        let length = self.clip.length_secs;
        self.resume_position = if !position_secs.is_finite() || position_secs < 0.0 || length <= 0.0 {
            0.0
        } else {
            let wrapped = position_secs % length;
            // f32 remainder can land exactly on length after rounding
            if wrapped >= length { 0.0 } else { wrapped }
        };
    }

    /// Authoring order: track number ascending, then name
    pub fn cmp_order(&self, other: &Track) -> Ordering {
        self.track_number
            .cmp(&other.track_number)
            .then_with(|| self.name.cmp(&other.name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACK REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered collection of tracks with name lookup
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from catalog tracks
    ///
    /// A later track with an already-registered name is dropped with an
    /// error log; the first definition wins.
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut registry = Self::new();
        for track in tracks {
            registry.register(track);
        }
        registry
    }

    /// Register a track, returning false if the name is taken
    pub fn register(&mut self, track: Track) -> bool {
        match self.try_register(track) {
            Ok(()) => true,
            Err(e) => {
                log::error!("[TrackRegistry] {}", e);
                false
            }
        }
    }

    /// Register a track; a taken name is a [`AudioError::DuplicateName`]
    pub fn try_register(&mut self, track: Track) -> AudioResult<()> {
        if self.index.contains_key(&track.name) {
            return Err(AudioError::DuplicateName(track.name));
        }
        self.index.insert(track.name.clone(), self.tracks.len());
        self.tracks.push(track);
        Ok(())
    }

    /// Get a track by name
    pub fn get(&self, name: &str) -> Option<&Track> {
        self.index.get(name).map(|&i| &self.tracks[i])
    }

    /// Get a track by name, failing with [`AudioError::UnknownTrack`]
    pub fn lookup(&self, name: &str) -> AudioResult<&Track> {
        self.get(name).ok_or_else(|| AudioError::UnknownTrack(name.to_string()))
    }

    /// Whether a track with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Stored resume position of a track
    pub fn resume_position(&self, name: &str) -> Option<f32> {
        self.get(name).map(Track::resume_position)
    }

    /// Store a resume position for a track; unknown names are ignored
    pub fn set_resume_position(&mut self, name: &str, position_secs: f32) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.tracks[i].set_resume_position(position_secs);
                true
            }
            None => false,
        }
    }

    /// Sort into authoring order and rebuild the name index
    pub fn sort(&mut self) {
        self.tracks.sort_by(Track::cmp_order);
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
    }

    /// Iterate tracks in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Track names in registry order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
