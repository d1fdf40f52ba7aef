use serde::{Deserialize, Serialize};

use crate::session::{Phase, SessionState};

/// Every observable change between two snapshots produces an Event.
///
/// Collaborators (audio, speech, presentation) react to events; they never
/// feed anything back into the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        phase_duration_secs: f64,
        session_duration_secs: f64,
    },
    PhaseChanged {
        phase: Phase,
        cycles_completed: u64,
    },
    SessionPaused {
        session_remaining_secs: f64,
    },
    SessionResumed {
        session_remaining_secs: f64,
    },
    SessionCompleted {
        cycles_completed: u64,
    },
    SessionStopped {
        session_remaining_secs: f64,
    },
}

impl Event {
    /// Events describing the step from `prev` to `next`, in order.
    ///
    /// At most one `PhaseChanged` is produced per call no matter how many
    /// boundaries a single tick crossed; it names the phase the session
    /// landed in.
    pub fn between(prev: &SessionState, next: &SessionState) -> Vec<Event> {
        let mut events = Vec::new();

        let started = !prev.running && next.running;
        if started {
            events.push(Event::SessionStarted {
                phase_duration_secs: next.phase_duration,
                session_duration_secs: next.total_duration,
            });
        }

        if !started && prev.running && next.current_phase != prev.current_phase {
            events.push(Event::PhaseChanged {
                phase: next.current_phase,
                cycles_completed: next.cycles_completed,
            });
        }

        if !prev.paused && next.paused {
            events.push(Event::SessionPaused {
                session_remaining_secs: next.session_remaining,
            });
        } else if prev.paused && !next.paused && next.running {
            events.push(Event::SessionResumed {
                session_remaining_secs: next.session_remaining,
            });
        }

        if !prev.completed && next.completed {
            events.push(Event::SessionCompleted {
                cycles_completed: next.cycles_completed,
            });
        } else if prev.is_active() && !next.is_active() && !next.completed {
            events.push(Event::SessionStopped {
                session_remaining_secs: prev.session_remaining,
            });
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;

    fn started() -> (SessionConfig, SessionState) {
        let config = SessionConfig::new(4.0, 60.0).unwrap();
        (config, SessionState::started(&config))
    }

    #[test]
    fn start_from_idle() {
        let (_, state) = started();
        let events = Event::between(&SessionState::idle(), &state);
        assert_eq!(
            events,
            vec![Event::SessionStarted {
                phase_duration_secs: 4.0,
                session_duration_secs: 60.0,
            }]
        );
    }

    #[test]
    fn phase_change_reported_once_per_tick() {
        let (config, state) = started();
        let next = state.advanced(&config, 10.0);
        let events = Event::between(&state, &next);
        assert_eq!(
            events,
            vec![Event::PhaseChanged {
                phase: Phase::Exhale,
                cycles_completed: 0,
            }]
        );
    }

    #[test]
    fn no_event_within_a_phase() {
        let (config, state) = started();
        let next = state.advanced(&config, 1.0);
        assert!(Event::between(&state, &next).is_empty());
    }

    #[test]
    fn pause_and_resume() {
        let (_, state) = started();
        let paused = SessionState {
            paused: true,
            ..state
        };
        assert!(matches!(
            Event::between(&state, &paused).as_slice(),
            [Event::SessionPaused { .. }]
        ));
        assert!(matches!(
            Event::between(&paused, &state).as_slice(),
            [Event::SessionResumed { .. }]
        ));
    }

    #[test]
    fn completion_reported_once() {
        let config = SessionConfig::new(4.0, 8.0).unwrap();
        let state = SessionState::started(&config);
        let done = state.advanced(&config, 8.0);
        let events = Event::between(&state, &done);
        assert_eq!(
            events.last(),
            Some(&Event::SessionCompleted {
                cycles_completed: 0
            })
        );
        assert!(Event::between(&done, &done).is_empty());
    }

    #[test]
    fn stop_while_paused() {
        let (_, state) = started();
        let paused = SessionState {
            paused: true,
            ..state
        };
        let events = Event::between(&paused, &SessionState::idle());
        assert_eq!(
            events,
            vec![Event::SessionStopped {
                session_remaining_secs: 60.0
            }]
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Event::SessionCompleted {
            cycles_completed: 3,
        })
        .unwrap();
        assert_eq!(json["type"], "session_completed");
        assert_eq!(json["cycles_completed"], 3);
    }
}
