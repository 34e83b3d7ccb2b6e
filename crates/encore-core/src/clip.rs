//! Audio clip handles
//!
//! Decoding and asset loading live outside this crate. A clip is the
//! metadata the playback layer needs to reason about a decoded asset.

use serde::{Deserialize, Serialize};

/// Default clip sample rate (Hz)
pub const DEFAULT_CLIP_SAMPLE_RATE: u32 = 48000;

/// Handle to decoded audio owned by the asset source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    /// Asset identifier (path or bank key)
    pub id: String,
    /// Clip length in seconds
    pub length_secs: f32,
    /// Clip sample rate (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Total sample frames (0 = derive from length and rate)
    #[serde(default)]
    pub samples: u64,
}

fn default_sample_rate() -> u32 {
    DEFAULT_CLIP_SAMPLE_RATE
}

impl AudioClip {
    /// Create a clip, deriving the sample count from length and rate
    pub fn new(id: impl Into<String>, length_secs: f32, sample_rate: u32) -> Self {
        let length_secs = length_secs.max(0.0);
        Self {
            id: id.into(),
            length_secs,
            sample_rate,
            samples: (length_secs as f64 * sample_rate as f64).round() as u64,
        }
    }

    /// Total sample frames
    #[inline]
    pub fn total_samples(&self) -> u64 {
        if self.samples > 0 {
            self.samples
        } else {
            (self.length_secs.max(0.0) as f64 * self.sample_rate as f64).round() as u64
        }
    }

    /// Duration of one sample frame in seconds (0 for an invalid rate)
    #[inline]
    pub fn sample_period(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            1.0 / self.sample_rate as f32
        }
    }
}
