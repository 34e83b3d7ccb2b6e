//! Music transition requests

use serde::{Deserialize, Serialize};

/// Priority used when none is given, and the baseline before any
/// transition has been activated
pub const DEFAULT_PRIORITY: i32 = 0;

/// Request to change the active music track
///
/// An empty `target` fades the music to silence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Track to activate (empty = silence)
    pub target: String,
    /// Resume from the track's stored position instead of the start
    #[serde(default)]
    pub resume: bool,
    /// Crossfade duration in seconds
    #[serde(default)]
    pub duration_secs: f32,
    /// Skip the fade-in and start the new track at full volume
    #[serde(default)]
    pub start_from_max_volume: bool,
    /// Minimum baseline priority this request needs to be honored
    #[serde(default)]
    pub start_priority: i32,
    /// Baseline this request establishes once activated
    #[serde(default)]
    pub play_priority: i32,
}

impl TransitionRequest {
    /// Crossfade to `target` over `duration_secs`
    pub fn new(target: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            target: target.into(),
            resume: false,
            duration_secs: sanitize_duration(duration_secs),
            start_from_max_volume: false,
            start_priority: DEFAULT_PRIORITY,
            play_priority: DEFAULT_PRIORITY,
        }
    }

    /// Fade to silence over `duration_secs`
    pub fn silence(duration_secs: f32) -> Self {
        Self::new(String::new(), duration_secs)
    }

    /// Resume from the stored position
    pub fn resuming(mut self) -> Self {
        self.resume = true;
        self
    }

    /// Skip the fade-in
    pub fn from_max_volume(mut self) -> Self {
        self.start_from_max_volume = true;
        self
    }

    /// Set start and play priorities
    pub fn with_priority(mut self, start_priority: i32, play_priority: i32) -> Self {
        self.start_priority = start_priority;
        self.play_priority = play_priority;
        self
    }

    /// True for a fade-to-silence request
    #[inline]
    pub fn is_silence(&self) -> bool {
        self.target.is_empty()
    }

    /// Crossfade duration, never negative
    #[inline]
    pub fn duration(&self) -> f32 {
        sanitize_duration(self.duration_secs)
    }

    /// Fade-out length before the swap
    pub fn fade_out_duration(&self) -> f32 {
        if self.start_from_max_volume || self.is_silence() {
            self.duration()
        } else {
            self.duration() / 2.0
        }
    }

    /// Fade-in length after the swap
    pub fn fade_in_duration(&self) -> f32 {
        self.duration() / 2.0
    }
}

fn sanitize_duration(duration_secs: f32) -> f32 {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs
    } else {
        0.0
    }
}
