//! Audio System
//!
//! Owns every playback component and is the single thing an application
//! drives per frame:
//!
//! ```rust,ignore
//! let mut audio = AudioSystem::new(&catalog, &mut backend, mixer, config);
//! let handle = audio.handle();
//!
//! // each frame
//! audio.tick(unscaled_dt);
//! for event in audio.take_events() { /* ... */ }
//! audio.end_frame();
//! ```

use rtrb::Consumer;

use encore_core::{
    AudioBackend, AudioCatalog, AudioConfig, AudioContext, AudioEvent, MixerBackend, MixerControl,
    PitchTable, PlaybackDevice,
};

use crate::dispatcher::{PlayOutcome, SoundDispatcher};
use crate::handle::{AudioCommand, AudioHandle, command_channel};
use crate::ramp::{RampMode, ScalarRamp};
use crate::request::TransitionRequest;
use crate::scheduler::MusicScheduler;

/// Explicit context owning the music scheduler, sound dispatcher and mixer
pub struct AudioSystem<D: PlaybackDevice, M: MixerBackend> {
    context: AudioContext,
    scheduler: MusicScheduler<D>,
    dispatcher: SoundDispatcher<D>,
    mixer: MixerControl<M>,
    sound_pitch: ScalarRamp,
    pitch_table: PitchTable,
    handle: AudioHandle,
    command_rx: Consumer<AudioCommand>,
    pending_events: Vec<AudioEvent>,
}

impl<D: PlaybackDevice, M: MixerBackend> AudioSystem<D, M> {
    /// Build every component from a catalog
    ///
    /// Catalog and configuration problems are logged; construction always
    /// succeeds. Queues [`AudioEvent::Ready`].
    pub fn new<B>(catalog: &AudioCatalog, backend: &mut B, mixer: M, config: AudioConfig) -> Self
    where
        B: AudioBackend<Device = D>,
    {
        if let Err(errors) = config.validate() {
            for e in errors {
                log::error!("[AudioSystem] Invalid configuration: {}", e);
            }
        }
        if let Err(errors) = catalog.validate() {
            for e in errors {
                log::error!("[AudioSystem] Catalog: {}", e);
            }
        }

        let context = AudioContext::with_volumes(
            encore_core::floor_volume(config.music_volume),
            encore_core::floor_volume(config.sound_volume),
        );

        let music_device = backend.create_device("music");
        let scheduler = MusicScheduler::new(music_device, catalog.track_registry());
        let dispatcher = SoundDispatcher::new(
            backend,
            catalog.sounds.iter().cloned(),
            context.clone(),
            config.rng_seed,
        );
        let mixer = MixerControl::new(mixer, &config, context.clone());
        let sound_pitch = ScalarRamp::new(mixer.sound_pitch());
        let (handle, command_rx) = command_channel(config.command_queue_capacity, context.clone());

        log::info!(
            "[AudioSystem] Ready: {} tracks, {} sounds",
            scheduler.tracks().len(),
            dispatcher.len()
        );

        Self {
            context,
            scheduler,
            dispatcher,
            mixer,
            sound_pitch,
            pitch_table: PitchTable::new(),
            handle,
            command_rx,
            pending_events: vec![AudioEvent::Ready],
        }
    }

    /// Cloneable handle for other threads
    pub fn handle(&self) -> AudioHandle {
        self.handle.clone()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FRAME DRIVING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Apply queued commands, then advance every component
    pub fn tick(&mut self, unscaled_delta_secs: f32) {
        self.process_commands();

        self.scheduler.tick(unscaled_delta_secs);
        self.dispatcher.tick(unscaled_delta_secs);
        if let Some(pitch) = self.sound_pitch.advance(unscaled_delta_secs) {
            self.mixer.set_sound_pitch(pitch);
        }
    }

    /// Close the frame: sounds may trigger again
    pub fn end_frame(&mut self) {
        self.dispatcher.clear_played_this_frame();
    }

    /// Apply every queued handle command
    pub fn process_commands(&mut self) {
        while let Ok(cmd) = self.command_rx.pop() {
            self.apply(cmd);
        }
    }

    fn apply(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::PlayMusic { name, resume } => self.scheduler.play_immediate(&name, resume),
            AudioCommand::Transition(request) => self.scheduler.submit(request),
            AudioCommand::SchedulePlayAt { delay_secs, name } => {
                self.scheduler.schedule_play_at(delay_secs, &name)
            }
            AudioCommand::SetPlaybackFraction(fraction) => self.scheduler.set_playback_fraction(fraction),
            AudioCommand::ChangeMusicPitch { pitch, duration_secs } => {
                self.scheduler.change_pitch(pitch, duration_secs)
            }
            AudioCommand::ChangeMusicVolume { volume, duration_secs } => {
                self.scheduler.change_volume(volume, duration_secs)
            }
            AudioCommand::ResetMusicVolume => self.scheduler.reset_volume(),
            AudioCommand::PauseMusic(pause) => self.scheduler.pause(pause),
            AudioCommand::PlaySound {
                name,
                pitch,
                bypass_repeat_guard,
            } => {
                self.dispatcher.play_sound(&name, pitch, bypass_repeat_guard);
            }
            AudioCommand::StopSound { name } => self.dispatcher.stop_sound(&name),
            AudioCommand::SetMusicVolume(volume) => self.mixer.set_music_volume(volume),
            AudioCommand::SetSoundVolume(volume) => self.mixer.set_sound_volume(volume),
            AudioCommand::ChangeSoundPitch { pitch, duration_secs } => {
                self.change_sound_pitch(pitch, duration_secs)
            }
            AudioCommand::TransitionToSnapshot { name, duration_secs } => {
                self.mixer.transition_to_snapshot(&name, duration_secs)
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DIRECT API (tick thread)
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn play_music(&mut self, name: &str, resume: bool) {
        self.scheduler.play_immediate(name, resume);
    }

    pub fn transition(&mut self, request: TransitionRequest) {
        self.scheduler.submit(request);
    }

    pub fn play_sound(&mut self, name: &str, pitch: Option<f32>, bypass_repeat_guard: bool) -> PlayOutcome {
        self.dispatcher.play_sound(name, pitch, bypass_repeat_guard)
    }

    /// Ramp the global sound pitch (rate-based, from the mixer's current value)
    pub fn change_sound_pitch(&mut self, pitch: f32, duration_secs: f32) {
        let current = self.mixer.sound_pitch();
        self.sound_pitch.start(current, pitch, duration_secs, RampMode::Rate);
        self.mixer.set_sound_pitch(self.sound_pitch.value());
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.mixer.set_music_volume(volume);
    }

    pub fn set_sound_volume(&mut self, volume: f32) {
        self.mixer.set_sound_volume(volume);
    }

    pub fn transition_to_snapshot(&mut self, name: &str, duration_secs: f32) {
        self.mixer.transition_to_snapshot(name, duration_secs);
    }

    /// Set the game time scale (0 pauses sounds that do not play while paused)
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.context.set_time_scale(time_scale);
    }

    /// Drain notifications from every component
    pub fn take_events(&mut self) -> Vec<AudioEvent> {
        let mut events = std::mem::take(&mut self.pending_events);
        events.extend(self.scheduler.take_events());
        events.extend(self.mixer.take_events());
        events
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn context(&self) -> &AudioContext {
        &self.context
    }

    pub fn scheduler(&self) -> &MusicScheduler<D> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut MusicScheduler<D> {
        &mut self.scheduler
    }

    pub fn dispatcher(&self) -> &SoundDispatcher<D> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut SoundDispatcher<D> {
        &mut self.dispatcher
    }

    pub fn mixer(&self) -> &MixerControl<M> {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut MixerControl<M> {
        &mut self.mixer
    }

    pub fn pitch_table(&self) -> &PitchTable {
        &self.pitch_table
    }

    pub fn pitch_table_mut(&mut self) -> &mut PitchTable {
        &mut self.pitch_table
    }
}
