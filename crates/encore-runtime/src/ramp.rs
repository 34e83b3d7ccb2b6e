//! Scalar Ramps
//!
//! Linear interpolation of one scalar (volume, pitch) driven by unscaled
//! frame time. Two modes exist and behave differently:
//!
//! - [`RampMode::Timed`]: runs for exactly `duration` seconds of ticks,
//!   then snaps to the target.
//! - [`RampMode::Rate`]: advances `dt / duration` of the distance per tick
//!   and stops only once the value equals the target.
//!
//! Starting a ramp replaces any ramp already in flight.

use serde::{Deserialize, Serialize};

/// How a ramp measures progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampMode {
    /// Duration-based; terminates on elapsed time
    Timed,
    /// Rate-based; terminates on convergence
    Rate,
}

/// Identifies one started ramp
///
/// A ticket stays valid until its ramp finishes, is cancelled, or is
/// replaced by a newer ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RampTicket(u64);

#[derive(Debug, Clone)]
struct ActiveRamp {
    start: f32,
    target: f32,
    duration: f32,
    /// Seconds (Timed) or normalized progress (Rate)
    progress: f32,
    mode: RampMode,
}

/// Single-scalar ramp with last-writer-wins replacement
#[derive(Debug, Clone)]
pub struct ScalarRamp {
    value: f32,
    active: Option<ActiveRamp>,
    generation: u64,
}

impl ScalarRamp {
    pub fn new(initial: f32) -> Self {
        Self {
            value: initial,
            active: None,
            generation: 0,
        }
    }

    /// Start a ramp from `current` to `target`
    ///
    /// Replaces any in-flight ramp. A non-positive duration applies the
    /// target immediately; read it back with [`value`](Self::value).
    pub fn start(&mut self, current: f32, target: f32, duration_secs: f32, mode: RampMode) -> RampTicket {
        self.generation += 1;
        self.value = current;

        if duration_secs > 0.0 && duration_secs.is_finite() {
            self.active = Some(ActiveRamp {
                start: current,
                target,
                duration: duration_secs,
                progress: 0.0,
                mode,
            });
        } else {
            self.value = target;
            self.active = None;
        }

        RampTicket(self.generation)
    }

    /// Advance by unscaled seconds; returns the new value while ramping
    pub fn advance(&mut self, delta_secs: f32) -> Option<f32> {
        let ramp = self.active.as_mut()?;

        let finished = match ramp.mode {
            RampMode::Timed => {
                ramp.progress += delta_secs;
                if ramp.progress >= ramp.duration {
                    self.value = ramp.target;
                    true
                } else {
                    self.value = lerp(ramp.start, ramp.target, ramp.progress / ramp.duration);
                    false
                }
            }
            RampMode::Rate => {
                ramp.progress += delta_secs / ramp.duration;
                self.value = if ramp.progress >= 1.0 {
                    ramp.target
                } else {
                    lerp(ramp.start, ramp.target, ramp.progress)
                };
                self.value == ramp.target
            }
        };

        if finished {
            self.active = None;
        }
        Some(self.value)
    }

    /// Stop the in-flight ramp, keeping the current value
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Cancel and jump to a value
    pub fn set_immediate(&mut self, value: f32) {
        self.active = None;
        self.generation += 1;
        self.value = value;
    }

    /// Whether the ramp identified by `ticket` is still in flight
    pub fn is_running(&self, ticket: RampTicket) -> bool {
        self.active.is_some() && self.generation == ticket.0
    }

    /// Whether any ramp is in flight
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Last value produced
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Target of the in-flight ramp
    pub fn target(&self) -> Option<f32> {
        self.active.as_ref().map(|r| r.target)
    }
}

impl Default for ScalarRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 64.0;

    fn run(ramp: &mut ScalarRamp, ticks: usize) -> Option<f32> {
        let mut last = None;
        for _ in 0..ticks {
            last = ramp.advance(DT);
        }
        last
    }

    #[test]
    fn test_timed_ramp_reaches_target_on_time() {
        let mut ramp = ScalarRamp::new(1.0);
        let ticket = ramp.start(1.0, 0.0, 0.5, RampMode::Timed);

        run(&mut ramp, 16);
        assert_eq!(ramp.value(), 0.5);
        assert!(ramp.is_running(ticket));

        run(&mut ramp, 16);
        assert_eq!(ramp.value(), 0.0);
        assert!(!ramp.is_running(ticket));
        assert_eq!(ramp.advance(DT), None);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut ramp = ScalarRamp::new(1.0);
        let ticket = ramp.start(1.0, 0.25, 0.0, RampMode::Timed);
        assert_eq!(ramp.value(), 0.25);
        assert!(!ramp.is_running(ticket));

        ramp.start(0.25, 2.0, -1.0, RampMode::Rate);
        assert_eq!(ramp.value(), 2.0);
        assert!(!ramp.is_active());
    }

    #[test]
    fn test_new_ramp_replaces_old() {
        let mut ramp = ScalarRamp::new(0.0);
        let first = ramp.start(0.0, 1.0, 1.0, RampMode::Timed);
        run(&mut ramp, 32);

        let second = ramp.start(ramp.value(), 0.0, 0.25, RampMode::Timed);
        assert!(!ramp.is_running(first));
        assert!(ramp.is_running(second));

        run(&mut ramp, 16);
        assert_eq!(ramp.value(), 0.0);
        assert!(!ramp.is_active());
    }

    #[test]
    fn test_rate_ramp_converges() {
        let mut ramp = ScalarRamp::new(1.0);
        let ticket = ramp.start(1.0, 2.0, 0.25, RampMode::Rate);
        run(&mut ramp, 8);
        assert_eq!(ramp.value(), 1.5);
        run(&mut ramp, 8);
        assert_eq!(ramp.value(), 2.0);
        assert!(!ramp.is_running(ticket));
    }

    #[test]
    fn test_rate_and_timed_differ_when_already_at_target() {
        // Rate ramps stop on convergence, timed ramps always run their length
        let mut rate = ScalarRamp::new(1.0);
        rate.start(1.0, 1.0, 1.0, RampMode::Rate);
        assert_eq!(rate.advance(DT), Some(1.0));
        assert!(!rate.is_active());

        let mut timed = ScalarRamp::new(1.0);
        timed.start(1.0, 1.0, 1.0, RampMode::Timed);
        run(&mut timed, 63);
        assert!(timed.is_active());
        run(&mut timed, 1);
        assert!(!timed.is_active());
    }

    #[test]
    fn test_cancel_keeps_value() {
        let mut ramp = ScalarRamp::new(0.0);
        let ticket = ramp.start(0.0, 1.0, 1.0, RampMode::Timed);
        run(&mut ramp, 16);
        ramp.cancel();
        assert!(!ramp.is_running(ticket));
        assert_eq!(ramp.value(), 0.25);
        assert_eq!(ramp.advance(DT), None);
    }
}
