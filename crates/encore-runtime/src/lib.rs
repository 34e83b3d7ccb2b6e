//! # Encore Runtime
//!
//! Frame-driven playback on top of `encore-core`:
//!
//! - **MusicScheduler**: queued, priority-aware crossfades between tracks
//!   with per-track resume positions
//! - **SoundDispatcher**: name-addressed sound effects, one trigger per
//!   voice per frame
//! - **ScalarRamp**: timed and rate-based parameter ramps
//! - **AudioSystem**: owns all of the above; **AudioHandle** feeds it
//!   commands from other threads
//!
//! Everything advances from `tick(unscaled_delta_secs)`. No component
//! spawns threads or blocks.

#![allow(clippy::new_without_default)]

pub mod clock;
pub mod dispatcher;
pub mod handle;
pub mod ramp;
pub mod request;
pub mod scheduler;
pub mod system;

pub use clock::*;
pub use dispatcher::*;
pub use handle::{AudioCommand, AudioHandle};
pub use ramp::*;
pub use request::*;
pub use scheduler::*;
pub use system::*;
