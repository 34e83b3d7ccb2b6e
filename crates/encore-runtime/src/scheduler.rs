//! Music Scheduler
//!
//! Owns the music device and the active-track slot. Transition requests
//! are queued and executed one at a time:
//!
//! ```text
//!   submit() ──▶ queue ──▶ advance() ──▶ ActiveTransition
//!                              │             │
//!                   priority / redundancy    ├─ FadeToSilence ─▶ clear
//!                        skip loop           ├─ FadeOut ─▶ Swap ─▶ FadeIn
//!                                            └─ (complete) ─▶ advance()
//! ```
//!
//! Fades are ramps sampled from [`MusicScheduler::tick`]; nothing blocks.
//! A step whose ramp has zero length completes inside the call that
//! reached it.

use std::collections::VecDeque;

use encore_core::{AudioEvent, AudioResult, PlaybackDevice, Track, TrackRegistry};

use crate::clock::PlaybackClock;
use crate::ramp::{RampMode, RampTicket, ScalarRamp};
use crate::request::{DEFAULT_PRIORITY, TransitionRequest};

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSITION STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Step of an in-flight transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Not started yet
    Pending,
    /// Ramping to zero before clearing the active track
    FadeToSilence(RampTicket),
    /// Ramping the outgoing track to zero
    FadeOut(RampTicket),
    /// Swapping in the target track
    Swap,
    /// Ramping the incoming track to full volume
    FadeIn(RampTicket),
}

/// The transition currently being executed
#[derive(Debug, Clone)]
pub struct ActiveTransition {
    pub request: TransitionRequest,
    pub phase: TransitionPhase,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MUSIC SCHEDULER
// ═══════════════════════════════════════════════════════════════════════════════

/// Priority-aware music transition scheduler
pub struct MusicScheduler<D: PlaybackDevice> {
    device: D,
    tracks: TrackRegistry,
    active: Option<String>,
    active_track_volume: f32,
    queue: VecDeque<TransitionRequest>,
    /// Play priority of the most recently activated request
    baseline: i32,
    transition: Option<ActiveTransition>,
    volume: ScalarRamp,
    pitch: ScalarRamp,
    clock: PlaybackClock,
    pending_events: Vec<AudioEvent>,
}

impl<D: PlaybackDevice> MusicScheduler<D> {
    /// Create a scheduler driving `device`
    pub fn new(mut device: D, tracks: TrackRegistry) -> Self {
        device.set_looping(true);
        device.set_volume(1.0);
        let pitch = device.pitch();

        Self {
            device,
            tracks,
            active: None,
            active_track_volume: 1.0,
            queue: VecDeque::new(),
            baseline: DEFAULT_PRIORITY,
            transition: None,
            volume: ScalarRamp::new(1.0),
            pitch: ScalarRamp::new(pitch),
            clock: PlaybackClock::new(),
            pending_events: Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DIRECT PLAYBACK
    // ═══════════════════════════════════════════════════════════════════════════

    /// Switch to a track immediately, without crossfade or queueing
    ///
    /// Resets the priority baseline. Does nothing if the track is already
    /// active.
    pub fn play_immediate(&mut self, name: &str, resume: bool) {
        if let Err(e) = self.try_play_immediate(name, resume) {
            log::error!("[MusicScheduler] play_immediate: {}", e);
        }
    }

    fn try_play_immediate(&mut self, name: &str, resume: bool) -> AudioResult<()> {
        self.tracks.lookup(name)?;
        self.baseline = DEFAULT_PRIORITY;

        if self.active.as_deref() == Some(name) {
            return Ok(());
        }

        self.save_resume_position();
        self.set_active(name);
        self.reset_volume();
        self.seek_start(name, resume);
        self.device.play();
        Ok(())
    }

    /// Hard-cut to a track at `device_time + delay_secs`
    ///
    /// Playback stops immediately. If the named track is already active it
    /// stays stopped.
    pub fn schedule_play_at(&mut self, delay_secs: f32, name: &str) {
        if let Err(e) = self.try_schedule_play_at(delay_secs, name) {
            log::error!("[MusicScheduler] schedule_play_at: {}", e);
        }
    }

    fn try_schedule_play_at(&mut self, delay_secs: f32, name: &str) -> AudioResult<()> {
        self.tracks.lookup(name)?;

        let switching = self.active.as_deref() != Some(name);
        if switching {
            self.save_resume_position();
        }
        self.device.stop();

        if switching {
            self.set_active(name);
            let at = self.device.device_time() + delay_secs.max(0.0) as f64;
            self.device.play_scheduled(at);
        }
        Ok(())
    }

    /// Seek to a fraction of the active track
    pub fn set_playback_fraction(&mut self, fraction: f32) {
        if self.active.is_none() {
            return;
        }
        let position = self.clock.position_for_fraction(fraction);
        self.device.set_position(position);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUEUED TRANSITIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Queue a transition request and start it if idle
    pub fn submit(&mut self, request: TransitionRequest) {
        log::debug!(
            "[MusicScheduler] Queued \"{}\" (start={}, play={}, {:.2}s)",
            request.target,
            request.start_priority,
            request.play_priority,
            request.duration()
        );
        self.queue.push_back(request);
        self.advance();
    }

    /// Continue the in-flight transition and drain the queue
    fn advance(&mut self) {
        loop {
            if let Some(transition) = self.transition.take() {
                self.transition = self.drive(transition);
                if self.transition.is_some() {
                    return;
                }
            }

            let Some(request) = self.queue.pop_front() else {
                return;
            };

            if request.start_priority < self.baseline {
                log::debug!(
                    "[MusicScheduler] Skipped \"{}\": start priority {} < {}",
                    request.target,
                    request.start_priority,
                    self.baseline
                );
                continue;
            }

            if self.active.as_deref() == Some(request.target.as_str()) {
                log::debug!("[MusicScheduler] Skipped \"{}\": already active", request.target);
                continue;
            }

            self.baseline = request.play_priority;
            self.transition = Some(ActiveTransition {
                request,
                phase: TransitionPhase::Pending,
            });
        }
    }

    /// Run a transition until it has to wait for a ramp
    ///
    /// Returns the transition if it is still in flight.
    fn drive(&mut self, mut transition: ActiveTransition) -> Option<ActiveTransition> {
        loop {
            transition.phase = match transition.phase {
                TransitionPhase::Pending => {
                    let request = &transition.request;
                    if request.is_silence() {
                        TransitionPhase::FadeToSilence(self.ramp_volume(0.0, request.duration()))
                    } else if self.active.is_some() {
                        TransitionPhase::FadeOut(self.ramp_volume(0.0, request.fade_out_duration()))
                    } else {
                        TransitionPhase::Swap
                    }
                }
                TransitionPhase::FadeToSilence(ticket) => {
                    if self.volume.is_running(ticket) {
                        return Some(transition);
                    }
                    self.save_resume_position();
                    self.clear_active();
                    return None;
                }
                TransitionPhase::FadeOut(ticket) => {
                    if self.volume.is_running(ticket) {
                        return Some(transition);
                    }
                    TransitionPhase::Swap
                }
                TransitionPhase::Swap => {
                    let request = &transition.request;
                    self.save_resume_position();

                    if let Err(e) = self.tracks.lookup(&request.target) {
                        // The fade-out above has already run
                        log::error!("[MusicScheduler] Transition aborted: {}", e);
                        return None;
                    }

                    let target = request.target.clone();
                    self.set_active(&target);
                    self.seek_start(&target, request.resume);
                    self.device.play();

                    if request.start_from_max_volume {
                        self.set_volume_immediate(1.0);
                        return None;
                    }
                    TransitionPhase::FadeIn(self.ramp_volume(1.0, request.fade_in_duration()))
                }
                TransitionPhase::FadeIn(ticket) => {
                    if self.volume.is_running(ticket) {
                        return Some(transition);
                    }
                    return None;
                }
            };
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PARAMETERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Ramp music pitch (rate-based; immediate if `duration_secs <= 0`)
    pub fn change_pitch(&mut self, pitch: f32, duration_secs: f32) {
        let current = self.device.pitch();
        self.pitch.start(current, pitch, duration_secs, RampMode::Rate);
        self.device.set_pitch(self.pitch.value());
    }

    /// Ramp music volume over `duration_secs`
    ///
    /// Replaces any volume ramp in flight, including a crossfade step; the
    /// crossfade then continues from the next step.
    pub fn change_volume(&mut self, volume: f32, duration_secs: f32) {
        self.ramp_volume(volume, duration_secs);
    }

    /// Cancel any volume ramp and restore full volume
    pub fn reset_volume(&mut self) {
        self.set_volume_immediate(1.0);
    }

    /// Pause or resume the music device
    pub fn pause(&mut self, pause: bool) {
        if pause {
            self.device.pause();
        } else {
            self.device.unpause();
        }
    }

    /// Advance by one frame of unscaled time
    pub fn tick(&mut self, delta_secs: f32) {
        self.device.update(delta_secs);

        if let Some(pitch) = self.pitch.advance(delta_secs) {
            self.device.set_pitch(pitch);
        }
        if self.volume.advance(delta_secs).is_some() {
            self.apply_volume();
        }

        self.advance();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Detached copy of the active track
    pub fn current_track(&self) -> Option<Track> {
        self.active.as_deref().and_then(|name| self.tracks.get(name)).cloned()
    }

    pub fn current_track_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.device.is_playing()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Transition in flight, if any
    pub fn active_transition(&self) -> Option<&ActiveTransition> {
        self.transition.as_ref()
    }

    /// Requests waiting behind the active transition
    pub fn queued_requests(&self) -> usize {
        self.queue.len()
    }

    /// Elapsed playback time of the active track in seconds
    pub fn playback_time(&self) -> f32 {
        self.clock.time_from_samples(self.device.elapsed_samples())
    }

    /// Length of the active track in seconds (0 if none)
    pub fn track_length(&self) -> f32 {
        self.clock.length()
    }

    /// Fraction of the active track played, in `[0, 1]`
    pub fn playback_fraction(&self) -> f32 {
        self.clock.fraction(self.device.elapsed_samples())
    }

    /// Music bus volume (before per-track volume)
    pub fn volume(&self) -> f32 {
        self.volume.value()
    }

    /// Where the in-flight volume ramp is heading, if any
    pub fn volume_target(&self) -> Option<f32> {
        self.volume.target()
    }

    pub fn pitch(&self) -> f32 {
        self.device.pitch()
    }

    /// Play priority of the most recently activated request
    pub fn baseline_priority(&self) -> i32 {
        self.baseline
    }

    pub fn tracks(&self) -> &TrackRegistry {
        &self.tracks
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNALS
    // ═══════════════════════════════════════════════════════════════════════════

    fn ramp_volume(&mut self, target: f32, duration_secs: f32) -> RampTicket {
        let ticket = self
            .volume
            .start(self.volume.value(), target, duration_secs, RampMode::Timed);
        self.apply_volume();
        ticket
    }

    fn set_volume_immediate(&mut self, volume: f32) {
        self.volume.set_immediate(volume);
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.device.set_volume(self.volume.value() * self.active_track_volume);
    }

    /// Store the outgoing track's position
    fn save_resume_position(&mut self) {
        if let Some(name) = self.active.as_deref() {
            let position = self.device.position();
            self.tracks.set_resume_position(name, position);
        }
    }

    /// Bind a known track to the device and announce it
    fn set_active(&mut self, name: &str) {
        let Some(track) = self.tracks.get(name) else {
            return;
        };
        let track = track.clone();

        self.device.set_clip(Some(track.clip.clone()));
        self.clock.bind(Some(&track.clip));
        self.active_track_volume = track.volume;
        self.active = Some(track.name.clone());
        self.apply_volume();

        log::info!("[MusicScheduler] Now playing \"{}\"", track.name);
        self.pending_events.push(AudioEvent::TrackChanged(track));
    }

    fn clear_active(&mut self) {
        self.device.stop();
        self.device.set_clip(None);
        self.clock.bind(None);
        self.active_track_volume = 1.0;
        if self.active.take().is_some() {
            log::info!("[MusicScheduler] Music cleared");
            self.pending_events.push(AudioEvent::MusicCleared);
        }
    }

    fn seek_start(&mut self, name: &str, resume: bool) {
        let position = if resume {
            self.tracks.resume_position(name).unwrap_or(0.0)
        } else {
            0.0
        };
        self.device.set_position(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{AudioClip, AudioError, VirtualDevice};

    const DT: f32 = 1.0 / 64.0;

    fn scheduler() -> MusicScheduler<VirtualDevice> {
        let tracks = TrackRegistry::from_tracks([
            Track::new("a", AudioClip::new("a.ogg", 30.0, 48000)),
            Track::new("b", AudioClip::new("b.ogg", 20.0, 48000)),
        ]);
        MusicScheduler::new(VirtualDevice::new("music"), tracks)
    }

    fn ticks(s: &mut MusicScheduler<VirtualDevice>, n: usize) {
        for _ in 0..n {
            s.tick(DT);
        }
    }

    #[test]
    fn test_first_transition_swaps_without_fade_out() {
        let mut s = scheduler();
        s.submit(TransitionRequest::new("a", 1.0));

        // Nothing was active, so the swap happens synchronously
        assert_eq!(s.current_track_name(), Some("a"));
        assert!(s.is_playing());
        assert_eq!(s.volume(), 1.0);
        assert!(s.is_transitioning());

        ticks(&mut s, 32);
        assert!(!s.is_transitioning());
    }

    #[test]
    fn test_zero_duration_transition_is_synchronous() {
        let mut s = scheduler();
        s.play_immediate("a", false);
        s.submit(TransitionRequest::new("b", 0.0));
        assert_eq!(s.current_track_name(), Some("b"));
        assert!(!s.is_transitioning());
        assert_eq!(s.volume(), 1.0);
    }

    #[test]
    fn test_requests_queue_behind_transition() {
        let mut s = scheduler();
        s.play_immediate("a", false);
        s.submit(TransitionRequest::new("b", 1.0));
        s.submit(TransitionRequest::new("a", 1.0));
        assert_eq!(s.queued_requests(), 1);

        ticks(&mut s, 64);
        assert_eq!(s.current_track_name(), Some("b"));
        assert!(s.is_transitioning());
        assert_eq!(s.queued_requests(), 0);

        ticks(&mut s, 64);
        assert_eq!(s.current_track_name(), Some("a"));
        assert!(!s.is_transitioning());
    }

    #[test]
    fn test_pitch_change() {
        let mut s = scheduler();
        s.play_immediate("a", false);
        s.change_pitch(2.0, 0.5);
        ticks(&mut s, 16);
        assert_eq!(s.pitch(), 1.5);
        ticks(&mut s, 16);
        assert_eq!(s.pitch(), 2.0);

        s.change_pitch(0.5, 0.0);
        assert_eq!(s.pitch(), 0.5);
    }

    #[test]
    fn test_reset_volume_cancels_ramp() {
        let mut s = scheduler();
        s.play_immediate("a", false);
        s.change_volume(0.0, 1.0);
        ticks(&mut s, 16);
        assert_eq!(s.volume(), 0.75);

        s.reset_volume();
        assert_eq!(s.volume(), 1.0);
        ticks(&mut s, 16);
        assert_eq!(s.volume(), 1.0);
        assert_eq!(s.device().volume(), 1.0);
    }

    #[test]
    fn test_set_playback_fraction() {
        let mut s = scheduler();
        s.set_playback_fraction(0.5);
        assert_eq!(s.device().position(), 0.0);

        s.play_immediate("b", false);
        s.set_playback_fraction(0.25);
        assert_eq!(s.device().position(), 5.0);
        assert_eq!(s.playback_time(), 5.0);
        assert_eq!(s.track_length(), 20.0);

        s.set_playback_fraction(7.0);
        assert_eq!(s.device().position(), 20.0);
    }

    #[test]
    fn test_playback_fraction_query() {
        let mut s = scheduler();
        assert_eq!(s.playback_fraction(), 0.0);

        s.play_immediate("b", false);
        s.set_playback_fraction(0.25);
        assert_eq!(s.playback_fraction(), 0.25);
        ticks(&mut s, 320);
        assert_eq!(s.playback_fraction(), 0.5);
    }

    #[test]
    fn test_volume_target_follows_ramp() {
        let mut s = scheduler();
        s.play_immediate("a", false);
        assert_eq!(s.volume_target(), None);

        s.change_volume(0.25, 0.5);
        assert_eq!(s.volume_target(), Some(0.25));
        ticks(&mut s, 32);
        assert_eq!(s.volume_target(), None);
        assert_eq!(s.volume(), 0.25);
    }

    #[test]
    fn test_unknown_track_reported_as_error() {
        let mut s = scheduler();
        s.play_immediate("a", false);

        let err = s.try_play_immediate("missing", false).unwrap_err();
        assert!(matches!(err, AudioError::UnknownTrack(ref name) if name == "missing"));
        let err = s.try_schedule_play_at(1.0, "missing").unwrap_err();
        assert!(matches!(err, AudioError::UnknownTrack(_)));

        // Nothing changed
        assert_eq!(s.current_track_name(), Some("a"));
        assert!(s.is_playing());
    }

    #[test]
    fn test_pause_holds_playback() {
        let mut s = scheduler();
        s.play_immediate("a", false);
        ticks(&mut s, 64);
        s.pause(true);
        assert!(!s.is_playing());
        ticks(&mut s, 64);
        assert_eq!(s.playback_time(), 1.0);
        s.pause(false);
        assert!(s.is_playing());
    }
}
