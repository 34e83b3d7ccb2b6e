//! Sound Dispatcher
//!
//! Plays sound effects by name. Every definition gets a [`SoundVoice`]
//! at construction; one-shot sounds share a single fire-and-forget device,
//! everything else owns its own.
//!
//! A voice triggers at most once per frame unless the caller bypasses the
//! guard. The frame driver calls [`SoundDispatcher::clear_played_this_frame`]
//! after the frame's play calls.

use std::collections::HashMap;

use encore_core::{AudioBackend, AudioContext, AudioError, AudioResult, PlaybackDevice, SoundDefinition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Blank name
    Ignored,
    /// No sound with that name
    UnknownSound,
    /// Game is paused and the sound does not play while paused
    Paused,
    /// Already triggered this frame
    Suppressed,
    /// Fired on the shared one-shot device
    OneShot,
    /// Voice (re)started
    Started,
    /// Voice is mid-playback; left alone
    AlreadyRunning,
}

impl PlayOutcome {
    /// Whether the call produced an audible trigger
    pub fn triggered(self) -> bool {
        matches!(self, PlayOutcome::OneShot | PlayOutcome::Started)
    }
}

/// Runtime state of one sound definition
pub struct SoundVoice<D: PlaybackDevice> {
    definition: SoundDefinition,
    /// None for one-shots, which use the shared device
    device: Option<D>,
    played_this_frame: bool,
}

impl<D: PlaybackDevice> SoundVoice<D> {
    pub fn definition(&self) -> &SoundDefinition {
        &self.definition
    }

    /// Dedicated device (None for one-shot sounds)
    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn played_this_frame(&self) -> bool {
        self.played_this_frame
    }
}

/// Name-addressed sound playback with per-frame de-duplication
pub struct SoundDispatcher<D: PlaybackDevice> {
    voices: Vec<SoundVoice<D>>,
    index: HashMap<String, usize>,
    one_shot_device: D,
    context: AudioContext,
    rng: StdRng,
}

impl<D: PlaybackDevice> SoundDispatcher<D> {
    /// Create voices for every definition
    ///
    /// `rng_seed` fixes pitch randomization; None seeds from the OS.
    pub fn new<B>(
        backend: &mut B,
        definitions: impl IntoIterator<Item = SoundDefinition>,
        context: AudioContext,
        rng_seed: Option<u64>,
    ) -> Self
    where
        B: AudioBackend<Device = D>,
    {
        let one_shot_device = backend.create_device("sfx:one-shot");
        let mut voices = Vec::new();
        let mut index = HashMap::new();

        for definition in definitions {
            if index.contains_key(&definition.name) {
                log::error!("[SoundDispatcher] {}", AudioError::DuplicateName(definition.name));
                continue;
            }

            let device = if definition.one_shot {
                None
            } else {
                let mut device = backend.create_device(&format!("sfx:{}", definition.name));
                device.set_clip(Some(definition.clip.clone()));
                device.set_volume(definition.volume);
                device.set_pitch(definition.base_pitch);
                device.set_looping(definition.looping);
                device.set_output(definition.output.as_deref());
                Some(device)
            };

            index.insert(definition.name.clone(), voices.len());
            voices.push(SoundVoice {
                definition,
                device,
                played_this_frame: false,
            });
        }

        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        log::debug!("[SoundDispatcher] {} voices ready", voices.len());

        Self {
            voices,
            index,
            one_shot_device,
            context,
            rng,
        }
    }

    /// Play a sound with the default pitch rules and repeat guard
    pub fn play(&mut self, name: &str) -> PlayOutcome {
        self.play_sound(name, None, false)
    }

    /// Play a sound
    ///
    /// `pitch` overrides the definition's pitch. `bypass_repeat_guard`
    /// allows a second trigger within the same frame.
    pub fn play_sound(&mut self, name: &str, pitch: Option<f32>, bypass_repeat_guard: bool) -> PlayOutcome {
        if name.trim().is_empty() {
            return PlayOutcome::Ignored;
        }

        let slot = match self.slot(name) {
            Ok(slot) => slot,
            Err(e) => {
                log::error!("[SoundDispatcher] {}", e);
                return PlayOutcome::UnknownSound;
            }
        };

        let paused = self.context.is_paused();
        let voice = &mut self.voices[slot];

        if paused && !voice.definition.play_while_paused {
            return PlayOutcome::Paused;
        }
        if voice.played_this_frame && !bypass_repeat_guard {
            return PlayOutcome::Suppressed;
        }
        voice.played_this_frame = true;

        let pitch = pitch.unwrap_or_else(|| roll_pitch(&mut self.rng, &voice.definition));

        match voice.device.as_mut() {
            None => {
                let def = &voice.definition;
                self.one_shot_device.set_output(def.output.as_deref());
                self.one_shot_device.play_one_shot(&def.clip, def.volume, pitch);
                PlayOutcome::OneShot
            }
            Some(device) => {
                let samples = device.elapsed_samples();
                if samples == 0 || samples >= voice.definition.clip.total_samples() {
                    device.set_pitch(pitch);
                    device.set_position(0.0);
                    device.play();
                    PlayOutcome::Started
                } else {
                    PlayOutcome::AlreadyRunning
                }
            }
        }
    }

    /// Stop a non-one-shot voice
    pub fn stop_sound(&mut self, name: &str) {
        match self.slot(name) {
            Ok(slot) => {
                if let Some(device) = self.voices[slot].device.as_mut() {
                    device.stop();
                }
            }
            Err(e) => log::error!("[SoundDispatcher] {}", e),
        }
    }

    fn slot(&self, name: &str) -> AudioResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| AudioError::UnknownSound(name.to_string()))
    }

    /// Reset every voice's per-frame flag
    pub fn clear_played_this_frame(&mut self) {
        for voice in &mut self.voices {
            voice.played_this_frame = false;
        }
    }

    /// Advance every device by one frame
    pub fn tick(&mut self, delta_secs: f32) {
        self.one_shot_device.update(delta_secs);
        for voice in &mut self.voices {
            if let Some(device) = voice.device.as_mut() {
                device.update(delta_secs);
            }
        }
    }

    pub fn voice(&self, name: &str) -> Option<&SoundVoice<D>> {
        self.index.get(name).map(|&slot| &self.voices[slot])
    }

    /// Shared device used by one-shot sounds
    pub fn one_shot_device(&self) -> &D {
        &self.one_shot_device
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

/// Pitch for one trigger: base pitch, or uniform within the fluctuation
fn roll_pitch(rng: &mut StdRng, definition: &SoundDefinition) -> f32 {
    if !definition.has_fluctuation() {
        return definition.base_pitch;
    }
    let spread = definition.pitch_fluctuation.abs();
    let low = definition.base_pitch - spread;
    let high = definition.base_pitch + spread;
    if low < high {
        rng.random_range(low..=high)
    } else {
        definition.base_pitch
    }
}
