//! Audio Catalog
//!
//! The music and sound database loaded once at startup. Stored as JSON;
//! authoring tools use the sort helpers to keep the file in a stable order.

use crate::sound::SoundDefinition;
use crate::track::{Track, TrackRegistry};
use crate::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Catalog format version
pub const CATALOG_VERSION: &str = "1.0";

/// Music and sound database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioCatalog {
    /// Catalog format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Background music tracks
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Sound effects
    #[serde(default)]
    pub sounds: Vec<SoundDefinition>,
}

fn default_version() -> String {
    CATALOG_VERSION.to_string()
}

impl Default for AudioCatalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            tracks: Vec::new(),
            sounds: Vec::new(),
        }
    }
}

impl AudioCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Add a sound
    pub fn add_sound(&mut self, sound: SoundDefinition) {
        self.sounds.push(sound);
    }

    /// Load catalog from JSON string
    pub fn from_json(json: &str) -> AudioResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        if catalog.version != CATALOG_VERSION {
            return Err(AudioError::InvalidConfiguration(format!(
                "Unknown catalog version: {}",
                catalog.version
            )));
        }
        Ok(catalog)
    }

    /// Load catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> AudioResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save catalog to JSON string
    pub fn to_json(&self) -> AudioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write catalog to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> AudioResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Sort tracks by track number, then name
    pub fn sort_tracks(&mut self) {
        self.tracks.sort_by(Track::cmp_order);
    }

    /// Sort sounds by name
    pub fn sort_sounds(&mut self) {
        self.sounds.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Validate catalog
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for track in &self.tracks {
            if track.name.is_empty() {
                // Empty name is reserved for "fade to silence" requests
                errors.push("Track with empty name".to_string());
            } else if !seen.insert(track.name.as_str()) {
                errors.push(format!("Duplicate track name '{}'", track.name));
            }
            if track.clip.length_secs <= 0.0 {
                errors.push(format!("Track '{}' has a non-positive length", track.name));
            }
        }

        let mut seen = HashSet::new();
        for sound in &self.sounds {
            if sound.name.trim().is_empty() {
                errors.push("Sound with blank name".to_string());
            } else if !seen.insert(sound.name.as_str()) {
                errors.push(format!("Duplicate sound name '{}'", sound.name));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Build the runtime track registry
    pub fn track_registry(&self) -> TrackRegistry {
        TrackRegistry::from_tracks(self.tracks.iter().cloned())
    }

    /// Get a track by name
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Get a sound by name
    pub fn sound(&self, name: &str) -> Option<&SoundDefinition> {
        self.sounds.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::AudioClip;

    fn sample_catalog() -> AudioCatalog {
        let mut catalog = AudioCatalog::new();
        catalog.add_track(Track::new("boss", AudioClip::new("boss.ogg", 90.0, 48000)).with_track_number(3));
        catalog.add_track(Track::new("title", AudioClip::new("title.ogg", 60.0, 48000)).with_track_number(1));
        catalog.add_track(Track::new("field", AudioClip::new("field.ogg", 120.0, 48000)).with_track_number(3));
        catalog.add_sound(SoundDefinition::new("jump", AudioClip::new("jump.wav", 0.3, 48000)));
        catalog.add_sound(SoundDefinition::new("coin", AudioClip::new("coin.wav", 0.2, 48000)));
        catalog
    }

    #[test]
    fn test_sort_utilities() {
        let mut catalog = sample_catalog();
        catalog.sort_tracks();
        catalog.sort_sounds();

        let tracks: Vec<_> = catalog.tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tracks, vec!["title", "boss", "field"]);
        let sounds: Vec<_> = catalog.sounds.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(sounds, vec!["coin", "jump"]);
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let catalog = sample_catalog();
        let json = catalog.to_json().unwrap();
        let loaded = AudioCatalog::from_json(&json).unwrap();
        assert_eq!(loaded.tracks.len(), 3);
        assert_eq!(loaded.tracks[0].name, "boss");
        assert_eq!(loaded.sound("coin").unwrap().clip.id, "coin.wav");
    }

    #[test]
    fn test_unknown_version_rejected() {
        let json = r#"{ "version": "9.9", "tracks": [], "sounds": [] }"#;
        let err = AudioCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, AudioError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_validate_duplicates() {
        let mut catalog = sample_catalog();
        catalog.add_sound(SoundDefinition::new("jump", AudioClip::new("jump2.wav", 0.3, 48000)));
        catalog.add_track(Track::new("", AudioClip::new("x.ogg", 1.0, 48000)));

        let errors = catalog.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("jump")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        sample_catalog().save(&path).unwrap();

        let loaded = AudioCatalog::load(&path).unwrap();
        assert!(loaded.validate().is_ok());
        assert_eq!(loaded.track_registry().len(), 3);
    }
}
