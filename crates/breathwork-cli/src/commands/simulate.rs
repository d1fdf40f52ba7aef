use std::path::Path;

use breathwork_core::{Event, SessionConfig, SessionState, SessionTimer, ValidationError};
use clap::Args;
use serde::Serialize;

/// Upper bound on ticks so a tiny step cannot spin for minutes.
const MAX_TICKS: u64 = 1_000_000;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Seconds per phase (defaults to the configured pace)
    #[arg(long)]
    pub pace: Option<f64>,
    /// Session length in seconds (defaults to the configured length)
    #[arg(long)]
    pub seconds: Option<f64>,
    /// Seconds fed to each tick
    #[arg(long, default_value_t = 0.1)]
    pub step: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub ticks: u64,
    pub events: Vec<Event>,
    #[serde(rename = "final")]
    pub final_state: SessionState,
}

/// Start a session and advance it by `step` until it completes.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidValue`] for a non-positive step, or one
/// so small that completion would take more than `MAX_TICKS` ticks.
pub fn simulate(session: SessionConfig, step: f64) -> Result<SimulationReport, ValidationError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "step".into(),
            message: format!("must be a positive number of seconds, got {step}"),
        });
    }
    if session.session_duration_secs / step > MAX_TICKS as f64 {
        return Err(too_many_ticks(session, step));
    }

    let mut timer = SessionTimer::new();
    let mut state = timer.start(session);
    let mut ticks = 0;
    while state.running && ticks < MAX_TICKS {
        state = timer.advance(step);
        ticks += 1;
    }
    if state.running {
        return Err(too_many_ticks(session, step));
    }

    Ok(SimulationReport {
        ticks,
        events: timer.drain_events(),
        final_state: state,
    })
}

fn too_many_ticks(session: SessionConfig, step: f64) -> ValidationError {
    ValidationError::InvalidValue {
        field: "step".into(),
        message: format!(
            "{step}s is too small to finish a {}s session within {MAX_TICKS} ticks",
            session.session_duration_secs
        ),
    }
}

pub fn run(args: SimulateArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let session = SessionConfig::new(
        args.pace.unwrap_or(config.session.phase_duration_secs),
        args.seconds.unwrap_or(config.session.session_duration_secs),
    )?;
    let report = simulate(session, args.step)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
