//! Audio Handle
//!
//! Thread-safe front door to an [`AudioSystem`](crate::AudioSystem). The
//! handle only queues commands; the system applies them at the start of
//! its next `tick()`, on the thread that owns it.
//!
//! ```text
//!   Game / UI threads                      Tick thread
//!   ┌──────────────────┐                ┌──────────────────┐
//!   │ AudioHandle      │───Command─────▶│ AudioSystem      │
//!   │ (Clone + Sync)   │   (rtrb)       │ .tick()          │
//!   └──────────────────┘                └──────────────────┘
//! ```

use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use encore_core::AudioContext;

use crate::request::TransitionRequest;

// ═══════════════════════════════════════════════════════════════════════════════
// COMMAND TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Commands sent to the tick thread
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Switch music without crossfade
    PlayMusic { name: String, resume: bool },
    /// Queue a music transition
    Transition(TransitionRequest),
    /// Hard-cut to a track after a delay
    SchedulePlayAt { delay_secs: f32, name: String },
    /// Seek music to a fraction of its length
    SetPlaybackFraction(f32),
    /// Ramp music pitch
    ChangeMusicPitch { pitch: f32, duration_secs: f32 },
    /// Ramp music volume
    ChangeMusicVolume { volume: f32, duration_secs: f32 },
    /// Restore full music volume
    ResetMusicVolume,
    /// Pause / resume music
    PauseMusic(bool),
    /// Trigger a sound effect
    PlaySound {
        name: String,
        pitch: Option<f32>,
        bypass_repeat_guard: bool,
    },
    /// Stop a sound effect voice
    StopSound { name: String },
    /// Set the music bus volume (linear)
    SetMusicVolume(f32),
    /// Set the sound bus volume (linear)
    SetSoundVolume(f32),
    /// Ramp the global sound pitch
    ChangeSoundPitch { pitch: f32, duration_secs: f32 },
    /// Blend to a mixer snapshot
    TransitionToSnapshot { name: String, duration_secs: f32 },
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

struct HandleShared {
    command_tx: Mutex<Producer<AudioCommand>>,
    context: AudioContext,
    dropped: AtomicU64,
}

/// Cloneable command handle
#[derive(Clone)]
pub struct AudioHandle {
    shared: Arc<HandleShared>,
}

/// Create a handle and the consumer the tick thread drains
pub(crate) fn command_channel(capacity: usize, context: AudioContext) -> (AudioHandle, Consumer<AudioCommand>) {
    let (command_tx, command_rx) = RingBuffer::new(capacity.max(1));
    let handle = AudioHandle {
        shared: Arc::new(HandleShared {
            command_tx: Mutex::new(command_tx),
            context,
            dropped: AtomicU64::new(0),
        }),
    };
    (handle, command_rx)
}

impl AudioHandle {
    /// Queue a command, dropping it if the queue is full
    pub fn push_command(&self, cmd: AudioCommand) -> bool {
        let mut tx = self.shared.command_tx.lock();
        match tx.push(cmd) {
            Ok(()) => true,
            Err(rtrb::PushError::Full(cmd)) => {
                self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("[AudioHandle] Command queue full, dropped {:?}", cmd);
                false
            }
        }
    }

    /// Commands dropped because the queue was full
    pub fn dropped_commands(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MUSIC
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn play_music(&self, name: &str, resume: bool) {
        self.push_command(AudioCommand::PlayMusic {
            name: name.to_string(),
            resume,
        });
    }

    pub fn transition(&self, request: TransitionRequest) {
        self.push_command(AudioCommand::Transition(request));
    }

    pub fn schedule_play_at(&self, delay_secs: f32, name: &str) {
        self.push_command(AudioCommand::SchedulePlayAt {
            delay_secs,
            name: name.to_string(),
        });
    }

    pub fn set_playback_fraction(&self, fraction: f32) {
        self.push_command(AudioCommand::SetPlaybackFraction(fraction));
    }

    pub fn change_music_pitch(&self, pitch: f32, duration_secs: f32) {
        self.push_command(AudioCommand::ChangeMusicPitch { pitch, duration_secs });
    }

    pub fn change_music_volume(&self, volume: f32, duration_secs: f32) {
        self.push_command(AudioCommand::ChangeMusicVolume { volume, duration_secs });
    }

    pub fn reset_music_volume(&self) {
        self.push_command(AudioCommand::ResetMusicVolume);
    }

    pub fn pause_music(&self, pause: bool) {
        self.push_command(AudioCommand::PauseMusic(pause));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SOUNDS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn play_sound(&self, name: &str) {
        self.play_sound_ext(name, None, false);
    }

    pub fn play_sound_ext(&self, name: &str, pitch: Option<f32>, bypass_repeat_guard: bool) {
        self.push_command(AudioCommand::PlaySound {
            name: name.to_string(),
            pitch,
            bypass_repeat_guard,
        });
    }

    pub fn stop_sound(&self, name: &str) {
        self.push_command(AudioCommand::StopSound { name: name.to_string() });
    }

    pub fn change_sound_pitch(&self, pitch: f32, duration_secs: f32) {
        self.push_command(AudioCommand::ChangeSoundPitch { pitch, duration_secs });
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MIXER / GLOBAL
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn set_music_volume(&self, volume: f32) {
        self.push_command(AudioCommand::SetMusicVolume(volume));
    }

    pub fn set_sound_volume(&self, volume: f32) {
        self.push_command(AudioCommand::SetSoundVolume(volume));
    }

    pub fn transition_to_snapshot(&self, name: &str, duration_secs: f32) {
        self.push_command(AudioCommand::TransitionToSnapshot {
            name: name.to_string(),
            duration_secs,
        });
    }

    /// Set the game time scale; applies immediately
    pub fn set_time_scale(&self, time_scale: f32) {
        self.shared.context.set_time_scale(time_scale);
    }

    pub fn is_paused(&self) -> bool {
        self.shared.context.is_paused()
    }

    /// Last applied music volume
    pub fn music_volume(&self) -> f32 {
        self.shared.context.music_volume()
    }

    /// Last applied sound volume
    pub fn sound_volume(&self) -> f32 {
        self.shared.context.sound_volume()
    }
}
