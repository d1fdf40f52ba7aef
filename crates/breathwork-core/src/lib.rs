//! # Breathwork Core Library
//!
//! Core logic for a guided box-breathing exercise. The command line driver
//! and any graphical front end are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Session Timer**: a wall-clock-driven state machine that cycles
//!   Inhale, Hold, Exhale, Hold. The caller supplies time, either as
//!   timestamps via `on_tick()` or as deltas via `advance()`
//! - **Events**: transitions derived from consecutive snapshots, consumed by
//!   audio and speech layers
//! - **Cues**: decides when a phase prompt should be spoken
//! - **Config**: TOML defaults for pace, session length and display timing
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: the state machine
//! - [`SessionState`]: immutable snapshot read by collaborators
//! - [`Event`]: one-directional notifications from the core
//! - [`Config`]: application configuration

pub mod config;
pub mod cues;
pub mod error;
pub mod events;
pub mod presets;
pub mod session;

pub use config::Config;
pub use cues::{Cue, CueTracker};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use presets::{DurationOption, Pace, SESSION_DURATIONS};
pub use session::{Phase, SessionConfig, SessionState, SessionStatus, SessionTimer};
