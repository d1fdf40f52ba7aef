use breathwork_core::presets::{DEFAULT_SESSION_SECS, CUSTOM_MINUTES_MAX, CUSTOM_MINUTES_MIN};
use breathwork_core::{Pace, SESSION_DURATIONS};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let presets = serde_json::json!({
        "durations": SESSION_DURATIONS,
        "default_session_secs": DEFAULT_SESSION_SECS,
        "custom_minutes": { "min": CUSTOM_MINUTES_MIN, "max": CUSTOM_MINUTES_MAX },
        "pace": Pace::default(),
    });
    println!("{}", serde_json::to_string_pretty(&presets)?);
    Ok(())
}
