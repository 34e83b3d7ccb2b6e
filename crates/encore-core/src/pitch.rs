//! Musical pitch helpers
//!
//! Maps note counters onto playback-rate multipliers so repeated sounds
//! (combo hits, pickups) can climb a scale.

/// Playback-rate ratios for two octaves of semitones
pub const CHROMATIC: [f32; 25] = [
    1.0, 1.059, 1.122, 1.189, 1.259, 1.335, 1.414, 1.498, 1.587, 1.681, 1.782, 1.888,
    2.0, 2.119, 2.245, 2.430, 2.520, 2.670, 2.891, 2.997, 3.244, 3.364, 3.641, 3.776,
    4.0,
];

/// Semitone steps of the major scale
pub const MAJOR_INTERVALS: [i32; 15] = [0, 2, 2, 1, 2, 2, 2, 1, 2, 2, 1, 2, 2, 2, 1];

/// Semitone steps of the (harmonic) minor scale
pub const MINOR_INTERVALS: [i32; 15] = [0, 2, 1, 2, 2, 1, 3, 1, 2, 1, 2, 2, 1, 3, 1];

/// Semitone steps of the pentatonic scale
pub const PENTATONIC_INTERVALS: [i32; 11] = [0, 2, 2, 3, 2, 3, 2, 2, 3, 2, 3];

/// Notes in a typical climbing sequence
pub const PITCH_COUNT: i32 = 8;

/// Key and note counter for scale-based pitch selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchTable {
    key: i32,
    minor: bool,
    note_count: i32,
}

impl PitchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chromatic ratio for the current note count
    pub fn pitch(&self) -> f32 {
        CHROMATIC[wrap_index(self.note_count, CHROMATIC.len())]
    }

    /// Ratio for the scale degree `note_count + offset` in the current key
    pub fn major_pitch(&self, offset: i32) -> f32 {
        let intervals: &[i32] = if self.minor {
            &MINOR_INTERVALS
        } else {
            &MAJOR_INTERVALS
        };
        let note = wrap_index(self.note_count.wrapping_add(offset), intervals.len());
        self.scale_pitch(&intervals[..=note])
    }

    /// Ratio for pentatonic degree `offset` (ignores the note count)
    pub fn pentatonic_pitch(&self, offset: i32) -> f32 {
        let note = wrap_index(offset, PENTATONIC_INTERVALS.len());
        self.scale_pitch(&PENTATONIC_INTERVALS[..=note])
    }

    fn scale_pitch(&self, steps: &[i32]) -> f32 {
        // Widened so extreme keys cannot overflow
        let semitones = self.key as i64 + steps.iter().map(|&s| s as i64).sum::<i64>();
        let len = CHROMATIC.len() as i64;
        let octave = semitones / len + 1;
        let ratio = CHROMATIC[(semitones + octave - 1).rem_euclid(len) as usize];
        octave as f32 * ratio
    }

    /// Set key (semitones above the base) and mode
    ///
    /// A negative key is reported but still stored.
    pub fn set_key(&mut self, key: i32, minor: bool) {
        if key < 0 {
            log::error!("[PitchTable] Key cannot be negative: {}", key);
        }
        self.key = key;
        self.minor = minor;
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn is_minor(&self) -> bool {
        self.minor
    }

    pub fn set_note_count(&mut self, count: i32) {
        self.note_count = count;
    }

    pub fn note_count(&self) -> i32 {
        self.note_count
    }
}

#[inline]
fn wrap_index(value: i32, len: usize) -> usize {
    value.rem_euclid(len as i32) as usize
}
