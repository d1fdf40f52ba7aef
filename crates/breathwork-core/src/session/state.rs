//! Session snapshot and the pure tick transition.
//!
//! Everything a presentation or audio layer needs is stored on
//! [`SessionState`]. `phase_remaining` and `total_duration` are kept as real
//! fields rather than computed on read: both have their own update rules at
//! the completion instant and on stop.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::ValidationError;
use crate::presets::DEFAULT_PACE_SECS;

/// Remaining session time at or below which the session counts as finished.
///
/// Absorbs floating point and timer jitter so a session never stalls a few
/// milliseconds short of zero.
pub const COMPLETION_EPSILON: f64 = 0.05;

/// Immutable input for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Seconds spent in each of the four phases.
    pub phase_duration_secs: f64,
    /// Total wall-clock budget of the session in seconds.
    pub session_duration_secs: f64,
}

impl SessionConfig {
    /// Build a config, rejecting non-positive or non-finite durations.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] naming the offending field.
    pub fn new(phase_duration_secs: f64, session_duration_secs: f64) -> Result<Self, ValidationError> {
        check_positive("phase_duration_secs", phase_duration_secs)?;
        check_positive("session_duration_secs", session_duration_secs)?;
        Ok(Self {
            phase_duration_secs,
            session_duration_secs,
        })
    }

    /// Number of full breathing cycles that fit in the session.
    pub fn expected_cycles(&self) -> u64 {
        let cycle = self.phase_duration_secs * Phase::ALL.len() as f64;
        if cycle <= 0.0 {
            return 0;
        }
        (self.session_duration_secs / cycle).floor() as u64
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("must be a positive number of seconds, got {value}"),
        })
    }
}

/// Lifecycle view of a snapshot. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Complete session state at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub running: bool,
    pub paused: bool,
    pub completed: bool,
    pub current_phase: Phase,
    /// Seconds spent in the current phase since the last transition.
    pub phase_elapsed: f64,
    pub phase_duration: f64,
    pub phase_remaining: f64,
    pub session_remaining: f64,
    /// Original session length, kept for progress ratios.
    pub total_duration: f64,
    /// Times the cycle wrapped from `Hold2` back to `Inhale`.
    pub cycles_completed: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}

impl SessionState {
    /// Resting snapshot before any session has started.
    pub fn idle() -> Self {
        Self {
            running: false,
            paused: false,
            completed: false,
            current_phase: Phase::Inhale,
            phase_elapsed: 0.0,
            phase_duration: DEFAULT_PACE_SECS,
            phase_remaining: DEFAULT_PACE_SECS,
            session_remaining: 0.0,
            total_duration: 0.0,
            cycles_completed: 0,
        }
    }

    /// Fresh running snapshot for `config`.
    pub fn started(config: &SessionConfig) -> Self {
        Self {
            running: true,
            paused: false,
            completed: false,
            current_phase: Phase::Inhale,
            phase_elapsed: 0.0,
            phase_duration: config.phase_duration_secs,
            phase_remaining: config.phase_duration_secs,
            session_remaining: config.session_duration_secs,
            total_duration: config.session_duration_secs,
            cycles_completed: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.completed {
            SessionStatus::Completed
        } else if self.paused {
            SessionStatus::Paused
        } else if self.running {
            SessionStatus::Running
        } else {
            SessionStatus::Idle
        }
    }

    /// A session is active while it is running or paused.
    pub fn is_active(&self) -> bool {
        self.running || self.paused
    }

    /// True when ticks should be fed to the session.
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }

    /// 0.0 .. 1.0 progress across the whole session.
    pub fn session_progress(&self) -> f64 {
        if self.total_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.session_remaining / self.total_duration).clamp(0.0, 1.0)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        if self.phase_duration <= 0.0 {
            return 1.0;
        }
        1.0 - (self.phase_remaining / self.phase_duration).min(1.0)
    }

    /// Advance this snapshot by `delta_secs` of elapsed time.
    ///
    /// Returns the snapshot unchanged unless it is running and not paused.
    /// A single large delta rolls through as many phase boundaries as it
    /// covers, so the current phase never lags behind real time after a
    /// stalled scheduler.
    ///
    /// `delta_secs` must be non-negative; callers guarantee monotonic
    /// timestamps.
    pub fn advanced(&self, config: &SessionConfig, delta_secs: f64) -> SessionState {
        debug_assert!(delta_secs >= 0.0, "negative tick delta: {delta_secs}");
        if !self.is_ticking() {
            return *self;
        }

        let phase_duration = config.phase_duration_secs;
        let mut next = *self;
        let mut phase_elapsed = self.phase_elapsed + delta_secs;
        next.session_remaining = (self.session_remaining - delta_secs).max(0.0);

        // A zero duration would never leave the loop.
        if phase_duration > 0.0 {
            while phase_elapsed >= phase_duration {
                phase_elapsed -= phase_duration;
                next.current_phase = next.current_phase.next();
                if next.current_phase == Phase::Inhale {
                    next.cycles_completed += 1;
                }
            }
        }

        if next.session_remaining <= COMPLETION_EPSILON {
            next.running = false;
            next.completed = true;
            next.paused = false;
            next.session_remaining = 0.0;
            phase_elapsed = phase_duration;
        }

        next.phase_duration = phase_duration;
        next.phase_remaining = (phase_duration - phase_elapsed).max(0.0);
        next.phase_elapsed = phase_elapsed.clamp(0.0, phase_duration.max(0.0));
        if next.total_duration == 0.0 {
            next.total_duration = config.session_duration_secs;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(phase: f64, session: f64) -> (SessionConfig, SessionState) {
        let config = SessionConfig::new(phase, session).unwrap();
        (config, SessionState::started(&config))
    }

    #[test]
    fn idle_snapshot_defaults() {
        let idle = SessionState::idle();
        assert_eq!(idle.status(), SessionStatus::Idle);
        assert_eq!(idle.current_phase, Phase::Inhale);
        assert_eq!(idle.phase_duration, 4.0);
        assert_eq!(idle.phase_remaining, 4.0);
        assert_eq!(idle.session_remaining, 0.0);
        assert_eq!(idle.total_duration, 0.0);
        assert!(!idle.is_active());
    }

    #[test]
    fn config_rejects_non_positive_durations() {
        assert!(SessionConfig::new(0.0, 60.0).is_err());
        assert!(SessionConfig::new(4.0, -1.0).is_err());
        assert!(SessionConfig::new(f64::NAN, 60.0).is_err());
        assert!(SessionConfig::new(4.0, f64::INFINITY).is_err());
        assert!(SessionConfig::new(4.0, 60.0).is_ok());
    }

    #[test]
    fn expected_cycles_floors() {
        let config = SessionConfig::new(4.0, 300.0).unwrap();
        assert_eq!(config.expected_cycles(), 18);
    }

    #[test]
    fn small_delta_stays_in_phase() {
        let (config, state) = running(4.0, 60.0);
        let next = state.advanced(&config, 1.5);
        assert_eq!(next.current_phase, Phase::Inhale);
        assert_eq!(next.phase_elapsed, 1.5);
        assert_eq!(next.phase_remaining, 2.5);
        assert_eq!(next.session_remaining, 58.5);
    }

    #[test]
    fn large_delta_rolls_through_several_phases() {
        let (config, state) = running(4.0, 60.0);
        let next = state.advanced(&config, 10.0);
        assert_eq!(next.current_phase, Phase::Exhale);
        assert_eq!(next.phase_elapsed, 2.0);
        assert_eq!(next.phase_remaining, 2.0);
        assert_eq!(next.cycles_completed, 0);
    }

    #[test]
    fn wrapping_into_inhale_counts_a_cycle() {
        let (config, state) = running(2.0, 60.0);
        let next = state.advanced(&config, 17.0);
        // 17 = 8 phases + 1s: two wraps, back in Inhale.
        assert_eq!(next.current_phase, Phase::Inhale);
        assert_eq!(next.cycles_completed, 2);
        assert_eq!(next.phase_elapsed, 1.0);
    }

    #[test]
    fn completes_within_tolerance() {
        let (config, state) = running(4.0, 0.03);
        let next = state.advanced(&config, 0.02);
        assert!(next.completed);
        assert!(!next.running);
        assert!(!next.paused);
        assert_eq!(next.session_remaining, 0.0);
        assert_eq!(next.phase_elapsed, 4.0);
        assert_eq!(next.phase_remaining, 0.0);
        assert_eq!(next.status(), SessionStatus::Completed);
    }

    #[test]
    fn session_remaining_never_negative() {
        let (config, state) = running(4.0, 5.0);
        let next = state.advanced(&config, 50.0);
        assert_eq!(next.session_remaining, 0.0);
        assert!(next.completed);
    }

    #[test]
    fn paused_or_idle_snapshot_is_unchanged() {
        let (config, state) = running(4.0, 60.0);
        let paused = SessionState {
            paused: true,
            ..state
        };
        assert_eq!(paused.advanced(&config, 3.0), paused);

        let idle = SessionState::idle();
        assert_eq!(idle.advanced(&config, 3.0), idle);
    }

    #[test]
    fn completed_snapshot_is_terminal() {
        let (config, state) = running(4.0, 4.0);
        let done = state.advanced(&config, 4.0);
        assert!(done.completed);
        assert_eq!(done.advanced(&config, 10.0), done);
    }

    #[test]
    fn progress_ratios() {
        let (config, state) = running(4.0, 100.0);
        let next = state.advanced(&config, 25.0);
        assert!((next.session_progress() - 0.25).abs() < 1e-9);
        // 25s = 6 phases + 1s into Exhale.
        assert!((next.phase_progress() - 0.25).abs() < 1e-9);
        assert_eq!(SessionState::idle().session_progress(), 0.0);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_value(SessionState::idle()).unwrap();
        assert_eq!(json["currentPhase"], "inhale");
        assert_eq!(json["phaseRemaining"], 4.0);
        assert_eq!(json["cyclesCompleted"], 0);
    }
}
