//! Playback device surface
//!
//! A [`PlaybackDevice`] is one output voice: a clip slot plus transport
//! controls. The runtime only talks to devices through this trait, so any
//! engine can sit behind it. [`VirtualDevice`] is a deterministic in-memory
//! implementation used by headless builds and tests.

use crate::clip::AudioClip;

// ═══════════════════════════════════════════════════════════════════════════════
// TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// One playback voice
pub trait PlaybackDevice {
    /// Bind a clip (None unbinds)
    fn set_clip(&mut self, clip: Option<AudioClip>);

    /// Currently bound clip
    fn clip(&self) -> Option<&AudioClip>;

    /// Start playback from the current position
    fn play(&mut self);

    /// Start playback at an absolute device timestamp (seconds)
    fn play_scheduled(&mut self, device_time: f64);

    /// Fire-and-forget playback that may overlap earlier one-shots
    fn play_one_shot(&mut self, clip: &AudioClip, volume: f32, pitch: f32);

    fn pause(&mut self);

    fn unpause(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    fn pitch(&self) -> f32;

    fn set_pitch(&mut self, pitch: f32);

    /// Playback position in seconds
    fn position(&self) -> f32;

    /// Seek to a position in seconds
    fn set_position(&mut self, position_secs: f32);

    /// Sample frames played since the clip start
    fn elapsed_samples(&self) -> u64;

    /// Output sample rate of the bound clip (0 if none)
    fn sample_rate(&self) -> u32;

    fn is_playing(&self) -> bool;

    fn set_looping(&mut self, looping: bool);

    /// Route output to a mixer group (None = master)
    fn set_output(&mut self, group: Option<&str>);

    fn output(&self) -> Option<&str>;

    /// Current device clock in seconds
    fn device_time(&self) -> f64;

    /// Advance device-side state by one frame
    ///
    /// Real engines advance on their own; the default does nothing.
    fn update(&mut self, _delta_secs: f32) {}
}

/// Factory for playback devices
pub trait AudioBackend {
    type Device: PlaybackDevice;

    /// Create a device; `label` is used for diagnostics only
    fn create_device(&mut self, label: &str) -> Self::Device;
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIRTUAL DEVICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Deterministic device that simulates playback from frame ticks
#[derive(Debug, Clone)]
pub struct VirtualDevice {
    label: String,
    clip: Option<AudioClip>,
    volume: f32,
    pitch: f32,
    position: f32,
    playing: bool,
    paused: bool,
    looping: bool,
    output: Option<String>,
    device_time: f64,
    scheduled_at: Option<f64>,
    play_count: u32,
    stop_count: u32,
    one_shots: Vec<OneShotRecord>,
}

/// Record of one fire-and-forget trigger
#[derive(Debug, Clone, PartialEq)]
pub struct OneShotRecord {
    pub clip_id: String,
    /// Mixer group the device was routed to when fired
    pub output: Option<String>,
    pub volume: f32,
    pub pitch: f32,
}

impl VirtualDevice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            clip: None,
            volume: 1.0,
            pitch: 1.0,
            position: 0.0,
            playing: false,
            paused: false,
            looping: false,
            output: None,
            device_time: 0.0,
            scheduled_at: None,
            play_count: 0,
            stop_count: 0,
            one_shots: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of times playback was started (immediate or scheduled)
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }

    /// One-shots fired on this device
    pub fn one_shots(&self) -> &[OneShotRecord] {
        &self.one_shots
    }

    /// Pending scheduled start timestamp
    pub fn scheduled_at(&self) -> Option<f64> {
        self.scheduled_at
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    fn clip_length(&self) -> f32 {
        self.clip.as_ref().map_or(0.0, |c| c.length_secs)
    }

    fn start(&mut self) {
        self.playing = true;
        self.paused = false;
        self.play_count += 1;
    }
}

impl PlaybackDevice for VirtualDevice {
    fn set_clip(&mut self, clip: Option<AudioClip>) {
        self.clip = clip;
        self.position = 0.0;
        self.playing = false;
        self.paused = false;
        self.scheduled_at = None;
    }

    fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    fn play(&mut self) {
        if self.clip.is_none() {
            log::warn!("[VirtualDevice:{}] play() without a clip", self.label);
            return;
        }
        self.scheduled_at = None;
        self.start();
    }

    fn play_scheduled(&mut self, device_time: f64) {
        if self.clip.is_none() {
            log::warn!("[VirtualDevice:{}] play_scheduled() without a clip", self.label);
            return;
        }
        if device_time <= self.device_time {
            self.scheduled_at = None;
            self.start();
        } else {
            self.scheduled_at = Some(device_time);
        }
    }

    fn play_one_shot(&mut self, clip: &AudioClip, volume: f32, pitch: f32) {
        self.one_shots.push(OneShotRecord {
            clip_id: clip.id.clone(),
            output: self.output.clone(),
            volume,
            pitch,
        });
    }

    fn pause(&mut self) {
        if self.playing {
            self.paused = true;
        }
    }

    fn unpause(&mut self) {
        self.paused = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
        self.position = 0.0;
        self.scheduled_at = None;
        self.stop_count += 1;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn set_position(&mut self, position_secs: f32) {
        let length = self.clip_length();
        self.position = if length > 0.0 {
            position_secs.clamp(0.0, length)
        } else {
            0.0
        };
    }

    fn elapsed_samples(&self) -> u64 {
        match &self.clip {
            Some(clip) => (self.position as f64 * clip.sample_rate as f64).round() as u64,
            None => 0,
        }
    }

    fn sample_rate(&self) -> u32 {
        self.clip.as_ref().map_or(0, |c| c.sample_rate)
    }

    fn is_playing(&self) -> bool {
        self.playing && !self.paused
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn set_output(&mut self, group: Option<&str>) {
        self.output = group.map(str::to_string);
    }

    fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn device_time(&self) -> f64 {
        self.device_time
    }

    fn update(&mut self, delta_secs: f32) {
        self.device_time += delta_secs as f64;

        if let Some(at) = self.scheduled_at {
            if self.device_time >= at {
                self.scheduled_at = None;
                self.start();
            }
            return;
        }

        if !self.is_playing() {
            return;
        }

        let length = self.clip_length();
        self.position += delta_secs * self.pitch.abs();
        if length > 0.0 && self.position >= length {
            if self.looping {
                self.position %= length;
            } else {
                // Finished: an engine reports a stopped voice at sample 0
                self.playing = false;
                self.position = 0.0;
            }
        }
    }
}

/// Backend producing [`VirtualDevice`]s
#[derive(Debug, Default)]
pub struct VirtualBackend {
    created: Vec<String>,
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels of every device created so far
    pub fn created(&self) -> &[String] {
        &self.created
    }
}

impl AudioBackend for VirtualBackend {
    type Device = VirtualDevice;

    fn create_device(&mut self, label: &str) -> VirtualDevice {
        self.created.push(label.to_string());
        VirtualDevice::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(length: f32) -> AudioClip {
        AudioClip::new("clip", length, 48000)
    }

    #[test]
    fn test_play_advances_position() {
        let mut device = VirtualDevice::new("music");
        device.set_clip(Some(clip(4.0)));
        device.play();
        device.update(0.5);
        assert!(device.is_playing());
        assert_eq!(device.position(), 0.5);
        assert_eq!(device.elapsed_samples(), 24000);
    }

    #[test]
    fn test_non_looping_stops_at_end() {
        let mut device = VirtualDevice::new("sfx");
        device.set_clip(Some(clip(1.0)));
        device.play();
        device.update(0.75);
        device.update(0.5);
        assert!(!device.is_playing());
        assert_eq!(device.elapsed_samples(), 0);
    }

    #[test]
    fn test_looping_wraps() {
        let mut device = VirtualDevice::new("loop");
        device.set_clip(Some(clip(1.0)));
        device.set_looping(true);
        device.play();
        device.update(0.75);
        device.update(0.5);
        assert!(device.is_playing());
        assert_eq!(device.position(), 0.25);
    }

    #[test]
    fn test_scheduled_start() {
        let mut device = VirtualDevice::new("music");
        device.set_clip(Some(clip(10.0)));
        device.play_scheduled(0.5);
        assert!(!device.is_playing());
        assert_eq!(device.scheduled_at(), Some(0.5));

        device.update(0.25);
        assert!(!device.is_playing());
        device.update(0.25);
        assert!(device.is_playing());
        assert_eq!(device.play_count(), 1);
    }

    #[test]
    fn test_pause_holds_position() {
        let mut device = VirtualDevice::new("music");
        device.set_clip(Some(clip(10.0)));
        device.play();
        device.update(1.0);
        device.pause();
        device.update(1.0);
        assert_eq!(device.position(), 1.0);
        device.unpause();
        device.update(1.0);
        assert_eq!(device.position(), 2.0);
    }

    #[test]
    fn test_play_without_clip_is_ignored() {
        let mut device = VirtualDevice::new("empty");
        device.play();
        assert!(!device.is_playing());
        assert_eq!(device.play_count(), 0);
    }

    #[test]
    fn test_one_shot_records_output() {
        let mut device = VirtualDevice::new("sfx:one-shot");
        let coin = clip(0.25);
        device.play_one_shot(&coin, 1.0, 1.0);
        device.set_output(Some("Sfx"));
        device.play_one_shot(&coin, 0.5, 1.2);

        assert_eq!(device.output(), Some("Sfx"));
        assert_eq!(device.one_shots()[0].output, None);
        assert_eq!(device.one_shots()[1].output.as_deref(), Some("Sfx"));
    }

    #[test]
    fn test_backend_tracks_labels() {
        let mut backend = VirtualBackend::new();
        let _a = backend.create_device("music");
        let _b = backend.create_device("sfx:jump");
        assert_eq!(backend.created(), &["music".to_string(), "sfx:jump".to_string()]);
    }
}
