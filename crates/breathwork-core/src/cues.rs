//! Spoken phase cues.
//!
//! A speech layer announces each phase as it begins. [`CueTracker`] decides
//! *when* to speak; producing audio is left to the caller.

use serde::Serialize;

use crate::session::{Phase, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cue {
    pub phase: Phase,
    pub text: &'static str,
}

/// Emits one cue per phase transition, never for a repeated phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct CueTracker {
    previous: Phase,
}

impl CueTracker {
    pub fn new(initial: Phase) -> Self {
        Self { previous: initial }
    }

    /// Observe the current phase.
    ///
    /// While disabled or paused the phase is remembered silently, so resuming
    /// does not replay a cue for a phase that began during the pause.
    pub fn observe(&mut self, enabled: bool, phase: Phase, paused: bool) -> Option<Cue> {
        if !enabled || paused || phase == self.previous {
            self.previous = phase;
            return None;
        }
        self.previous = phase;
        Some(Cue {
            phase,
            text: phase.prompt(),
        })
    }

    /// Observe a snapshot. Speech is only enabled while the session is
    /// running and not yet complete.
    pub fn observe_state(&mut self, speech_enabled: bool, state: &SessionState) -> Option<Cue> {
        let enabled = speech_enabled && state.running && !state.completed;
        self.observe(enabled, state.current_phase, state.paused)
    }
}
