//! # Encore Core
//!
//! Shared building blocks of the Encore playback layer:
//!
//! - **Catalog**: tracks and sound definitions loaded from JSON
//! - **Track registry**: name lookup and per-track resume positions
//! - **Devices**: the [`PlaybackDevice`] / [`AudioBackend`] seam plus a
//!   deterministic virtual implementation
//! - **Mixer**: named-parameter backend, volume attenuation, snapshots
//! - **Pitch table**: scale-based pitch selection
//! - **Context**: shared pause state and volumes
//!
//! Scheduling and dispatch live in `encore-runtime`.

#![allow(clippy::new_without_default)]

pub mod catalog;
pub mod clip;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod events;
pub mod mixer;
pub mod pitch;
pub mod sound;
pub mod track;

pub use catalog::*;
pub use clip::*;
pub use config::*;
pub use context::*;
pub use device::*;
pub use error::*;
pub use events::*;
pub use mixer::*;
pub use pitch::*;
pub use sound::*;
pub use track::*;
