use std::path::Path;
use std::time::{Duration, Instant};

use breathwork_core::presets::{custom_minutes, find_duration};
use breathwork_core::{Config, CoreError, CueTracker, SessionConfig, SessionTimer, ValidationError};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::render::Reporter;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Seconds per phase (3 to 8, in 0.5 steps)
    #[arg(long)]
    pub pace: Option<f64>,
    /// Session length in minutes
    #[arg(long, conflicts_with_all = ["preset", "seconds"])]
    pub minutes: Option<f64>,
    /// Session length preset id (see `breathwork presets`)
    #[arg(long, conflicts_with = "seconds")]
    pub preset: Option<String>,
    /// Session length in seconds
    #[arg(long)]
    pub seconds: Option<f64>,
    /// Do not print spoken cues
    #[arg(long)]
    pub no_speech: bool,
    /// Emit JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

/// Commands read from stdin while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Stop,
}

impl Control {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Control::Pause),
            "r" | "resume" => Some(Control::Resume),
            "s" | "stop" | "q" | "quit" => Some(Control::Stop),
            _ => None,
        }
    }
}

/// Resolve flags over configured defaults into a validated session config.
fn session_config(args: &RunArgs, config: &Config) -> Result<SessionConfig, CoreError> {
    let seconds = if let Some(minutes) = args.minutes {
        Some(custom_minutes(minutes)?)
    } else if let Some(id) = &args.preset {
        let option = find_duration(id).ok_or_else(|| ValidationError::InvalidValue {
            field: "preset".into(),
            message: format!("unknown preset '{id}'"),
        })?;
        Some(option.seconds)
    } else {
        args.seconds
    };
    Ok(config.session_config(args.pace, seconds)?)
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let session = session_config(&args, &config)?;
    let speech = config.cues.speech_enabled && !args.no_speech;
    let reporter = Reporter::new(args.json);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(session, speech, &config, &reporter));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}

async fn drive(
    session: SessionConfig,
    speech: bool,
    config: &Config,
    reporter: &Reporter,
) -> Result<(), Box<dyn std::error::Error>> {
    let origin = Instant::now();
    let mut timer = SessionTimer::new();
    let mut cues = CueTracker::new(timer.state().current_phase);

    let mut ticks = tokio::time::interval(Duration::from_millis(config.display.tick_interval_ms.max(1)));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut redraw =
        tokio::time::interval(Duration::from_millis(config.display.render_interval_ms.max(1)));
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_active = timer.start(session);
    reporter.intro(&session);
    if !reporter.is_json() {
        eprintln!("Commands: p = pause, r = resume, s = stop");
    }

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                timer.on_tick(origin.elapsed().as_secs_f64());
            }
            _ = redraw.tick() => {
                reporter.status(&timer.state());
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match Control::parse(&line) {
                    Some(Control::Pause) => { timer.pause(); }
                    Some(Control::Resume) => { timer.resume(); }
                    Some(Control::Stop) => { timer.stop(); }
                    None if line.trim().is_empty() => {}
                    None => eprintln!("unknown command '{}' (p, r, s)", line.trim()),
                },
                None => {
                    tracing::debug!("stdin closed, running without controls");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => {
                timer.stop();
            }
        }

        for event in timer.drain_events() {
            reporter.event(&event)?;
        }
        let state = timer.state();
        if let Some(cue) = cues.observe_state(speech, &state) {
            reporter.cue(&cue)?;
        }
        if !state.is_active() {
            break;
        }
        last_active = state;
    }

    // A stopped snapshot is reset to idle, so summarize the last active one.
    let state = timer.state();
    reporter.finish(if state.completed { &state } else { &last_active })?;
    Ok(())
}
