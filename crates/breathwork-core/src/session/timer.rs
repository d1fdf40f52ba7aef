//! Session timer.
//!
//! The timer is a wall-clock-driven state machine. It does not own a thread
//! or a clock: the caller either feeds timestamps through [`SessionTimer::on_tick`]
//! or steps it directly with [`SessionTimer::advance`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |          |
//!           v          v
//!       Completed    Idle (stop)
//! ```
//!
//! ## Usage
//!
//! ```
//! use breathwork_core::{SessionConfig, SessionTimer};
//!
//! let mut timer = SessionTimer::new();
//! timer.start(SessionConfig::new(4.0, 60.0).unwrap());
//! timer.on_tick(0.0);
//! let state = timer.on_tick(1.0);
//! assert_eq!(state.session_remaining, 59.0);
//! ```

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::state::{SessionConfig, SessionState};
use crate::events::Event;

/// Events kept for a caller that never drains. Past this the oldest are
/// dropped.
pub const MAX_PENDING_EVENTS: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    state: SessionState,
    /// Config of the current session. `None` before the first start and
    /// after stop.
    config: Option<SessionConfig>,
    /// Timestamp (seconds) of the last tick seen while running. Cleared on
    /// every transition into or out of the paused state.
    last_timestamp: Option<f64>,
    /// Events produced since the last drain, at most [`MAX_PENDING_EVENTS`].
    pending: VecDeque<Event>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Take every event produced since the previous call.
    ///
    /// Callers that want the full history must drain at least once every
    /// [`MAX_PENDING_EVENTS`] events; older undrained events are discarded.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.pending.drain(..).collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session, replacing whatever was there before.
    ///
    /// Both durations in `config` must be positive. This is not checked
    /// here; build the config with [`SessionConfig::new`] to validate it.
    pub fn start(&mut self, config: SessionConfig) -> SessionState {
        info!(
            phase_duration_secs = config.phase_duration_secs,
            session_duration_secs = config.session_duration_secs,
            "session started"
        );
        let current = self.state;
        let prev = if current.is_active() {
            // Restarting mid-session ends the old one first.
            let stopped = SessionState::idle();
            self.record(&current, &stopped);
            stopped
        } else {
            current
        };
        self.config = Some(config);
        self.last_timestamp = None;
        self.replace(prev, SessionState::started(&config))
    }

    /// Freeze the clock. No-op unless running and not paused.
    pub fn pause(&mut self) -> SessionState {
        if !self.state.is_ticking() {
            return self.state;
        }
        info!(
            session_remaining_secs = self.state.session_remaining,
            "session paused"
        );
        self.last_timestamp = None;
        let next = SessionState {
            paused: true,
            ..self.state
        };
        self.replace(self.state, next)
    }

    /// Unfreeze the clock. No-op unless running and paused.
    pub fn resume(&mut self) -> SessionState {
        if !(self.state.running && self.state.paused) {
            return self.state;
        }
        info!(
            session_remaining_secs = self.state.session_remaining,
            "session resumed"
        );
        self.last_timestamp = None;
        let next = SessionState {
            paused: false,
            ..self.state
        };
        self.replace(self.state, next)
    }

    /// Return to the idle snapshot from any state. Idempotent.
    ///
    /// The configured phase and session durations survive so that readers
    /// of the idle snapshot still see the last values used.
    pub fn stop(&mut self) -> SessionState {
        let phase_duration = self
            .config
            .map(|c| c.phase_duration_secs)
            .unwrap_or(self.state.phase_duration);
        let total_duration = self
            .config
            .map(|c| c.session_duration_secs)
            .unwrap_or(self.state.total_duration);
        if self.state.is_active() {
            info!(
                session_remaining_secs = self.state.session_remaining,
                "session stopped"
            );
        }
        self.config = None;
        self.last_timestamp = None;
        let next = SessionState {
            phase_duration,
            phase_remaining: phase_duration,
            total_duration,
            ..SessionState::idle()
        };
        self.replace(self.state, next)
    }

    /// Advance the session by `delta_secs` of elapsed time.
    ///
    /// No-op unless a session is running and not paused. `delta_secs` must
    /// be non-negative.
    pub fn advance(&mut self, delta_secs: f64) -> SessionState {
        let Some(config) = self.config else {
            return self.state;
        };
        let next = self.state.advanced(&config, delta_secs);
        if next.current_phase != self.state.current_phase {
            debug!(
                phase = %next.current_phase,
                cycles_completed = next.cycles_completed,
                "phase changed"
            );
        }
        if next.completed && !self.state.completed {
            info!(cycles_completed = next.cycles_completed, "session completed");
            self.last_timestamp = None;
        }
        self.replace(self.state, next)
    }

    /// Scheduler entry point. `timestamp_secs` must be monotonic.
    ///
    /// The first tick after start or resume only anchors the clock, so time
    /// spent paused is never reported as elapsed.
    pub fn on_tick(&mut self, timestamp_secs: f64) -> SessionState {
        if !self.state.is_ticking() {
            self.last_timestamp = None;
            return self.state;
        }
        let last = *self.last_timestamp.get_or_insert(timestamp_secs);
        let delta = (timestamp_secs - last).max(0.0);
        self.last_timestamp = Some(timestamp_secs);
        self.advance(delta)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn replace(&mut self, prev: SessionState, next: SessionState) -> SessionState {
        self.record(&prev, &next);
        self.state = next;
        next
    }

    fn record(&mut self, prev: &SessionState, next: &SessionState) {
        self.pending.extend(Event::between(prev, next));
        let overflow = self.pending.len().saturating_sub(MAX_PENDING_EVENTS);
        if overflow > 0 {
            warn!(dropped = overflow, "event queue full, dropping oldest events");
            self.pending.drain(..overflow);
        }
    }
}
