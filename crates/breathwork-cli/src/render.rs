//! Text and JSON output for a running session.

use breathwork_core::{Cue, Event, SessionConfig, SessionState, SessionStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

const BAR_WIDTH: usize = 20;

/// Format seconds as `m:ss`, rounding up so the display reaches 0:00 only
/// when the time is really up.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).ceil() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn progress_bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn status_line(state: &SessionState) -> String {
    let suffix = match state.status() {
        SessionStatus::Paused => " (paused)",
        _ => "",
    };
    format!(
        "{:<6} {:>4.1}s  [{}] {} left  cycles {}{}",
        state.current_phase.label(),
        state.phase_remaining,
        progress_bar(state.session_progress()),
        format_clock(state.session_remaining),
        state.cycles_completed,
        suffix,
    )
}

pub fn intro_line(session: &SessionConfig) -> String {
    format!(
        "Box breathing: {:.1}s per phase, {} session, about {} cycles.",
        session.phase_duration_secs,
        format_clock(session.session_duration_secs),
        session.expected_cycles(),
    )
}

pub fn summary(state: &SessionState) -> String {
    if state.completed {
        format!(
            "Session complete. Take a moment to notice how you feel. You completed {} full breathing cycles.",
            state.cycles_completed
        )
    } else {
        format!("Session stopped after {} cycles.", state.cycles_completed)
    }
}

#[derive(Serialize)]
struct Stamped<'a, T: Serialize> {
    at: DateTime<Utc>,
    #[serde(flatten)]
    body: &'a T,
}

/// Writes session output to stdout, either as human text or JSON lines.
pub struct Reporter {
    json: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn intro(&self, session: &SessionConfig) {
        if !self.json {
            println!("{}", intro_line(session));
        }
    }

    pub fn status(&self, state: &SessionState) {
        if !self.json {
            println!("{}", status_line(state));
        }
    }

    pub fn event(&self, event: &Event) -> Result<(), serde_json::Error> {
        if self.json {
            self.line(event)?;
        } else if let Event::SessionStarted { .. } = event {
            println!("{}", breathwork_core::Phase::Inhale.description());
        }
        Ok(())
    }

    pub fn cue(&self, cue: &Cue) -> Result<(), serde_json::Error> {
        if self.json {
            self.line(&serde_json::json!({ "type": "cue", "phase": cue.phase, "text": cue.text }))?;
        } else {
            println!(">> {}  {}", cue.text, cue.phase.description());
        }
        Ok(())
    }

    pub fn finish(&self, state: &SessionState) -> Result<(), serde_json::Error> {
        if self.json {
            self.line(&serde_json::json!({ "type": "final_state", "state": state }))?;
        } else {
            println!("{}", summary(state));
        }
        Ok(())
    }

    fn line<T: Serialize>(&self, body: &T) -> Result<(), serde_json::Error> {
        let stamped = Stamped {
            at: Utc::now(),
            body,
        };
        println!("{}", serde_json::to_string(&stamped)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_rounds_up() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(0.2), "0:01");
        assert_eq!(format_clock(59.5), "1:00");
        assert_eq!(format_clock(300.0), "5:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn bar_fills_with_progress() {
        assert_eq!(progress_bar(0.0), "-".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(1.0), "#".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(0.5).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn status_line_shows_phase_and_time() {
        let config = SessionConfig::new(4.0, 60.0).unwrap();
        let state = SessionState::started(&config).advanced(&config, 5.0);
        let line = status_line(&state);
        assert!(line.starts_with("Hold"));
        assert!(line.contains("0:55 left"));
        assert!(line.contains("cycles 0"));
    }

    #[test]
    fn intro_line_estimates_cycles() {
        let session = SessionConfig::new(4.0, 300.0).unwrap();
        assert_eq!(
            intro_line(&session),
            "Box breathing: 4.0s per phase, 5:00 session, about 18 cycles."
        );
    }

    #[test]
    fn summary_mentions_cycles() {
        let config = SessionConfig::new(4.0, 16.0).unwrap();
        let done = SessionState::started(&config).advanced(&config, 16.0);
        assert!(summary(&done).contains("completed 1 full breathing cycles"));
    }
}
