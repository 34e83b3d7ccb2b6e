//! Playback clock of the active track
//!
//! Converts the device's sample counter into seconds and exposes the
//! active clip's length.

use encore_core::AudioClip;

/// Length and sample period of the bound clip
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackClock {
    length_secs: f32,
    sample_period: f64,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind to a clip (None = nothing playing)
    pub fn bind(&mut self, clip: Option<&AudioClip>) {
        match clip {
            Some(clip) => {
                self.length_secs = clip.length_secs;
                self.sample_period = if clip.sample_rate == 0 {
                    0.0
                } else {
                    1.0 / clip.sample_rate as f64
                };
            }
            None => *self = Self::default(),
        }
    }

    /// Length of the bound clip in seconds
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_secs
    }

    /// Elapsed playback time for a sample counter
    #[inline]
    pub fn time_from_samples(&self, elapsed_samples: u64) -> f32 {
        (elapsed_samples as f64 * self.sample_period) as f32
    }

    /// Seek position for a fraction of the clip, clamped to `[0, 1]`
    pub fn position_for_fraction(&self, fraction: f32) -> f32 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        fraction * self.length_secs
    }

    /// Fraction of the clip played
    pub fn fraction(&self, elapsed_samples: u64) -> f32 {
        if self.length_secs <= 0.0 {
            0.0
        } else {
            (self.time_from_samples(elapsed_samples) / self.length_secs).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_from_samples() {
        let mut clock = PlaybackClock::new();
        clock.bind(Some(&AudioClip::new("a", 10.0, 48000)));
        assert_eq!(clock.length(), 10.0);
        assert_eq!(clock.time_from_samples(96000), 2.0);
        assert_eq!(clock.fraction(240000), 0.5);
    }

    #[test]
    fn test_fraction_clamped() {
        let mut clock = PlaybackClock::new();
        clock.bind(Some(&AudioClip::new("a", 8.0, 48000)));
        assert_eq!(clock.position_for_fraction(0.25), 2.0);
        assert_eq!(clock.position_for_fraction(3.0), 8.0);
        assert_eq!(clock.position_for_fraction(-1.0), 0.0);
    }

    #[test]
    fn test_unbound_clock_is_zero() {
        let mut clock = PlaybackClock::new();
        clock.bind(Some(&AudioClip::new("a", 8.0, 48000)));
        clock.bind(None);
        assert_eq!(clock.length(), 0.0);
        assert_eq!(clock.time_from_samples(48000), 0.0);
        assert_eq!(clock.fraction(48000), 0.0);
    }
}
