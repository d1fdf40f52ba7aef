//! Session length options and breathing pace bounds offered to the user.

use serde::Serialize;

use crate::error::ValidationError;

/// Seconds per phase when nothing else is chosen.
pub const DEFAULT_PACE_SECS: f64 = 4.0;

/// A selectable session length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationOption {
    pub id: &'static str,
    pub label: &'static str,
    pub seconds: f64,
}

pub const SESSION_DURATIONS: [DurationOption; 5] = [
    DurationOption {
        id: "2min",
        label: "2 min",
        seconds: 2.0 * 60.0,
    },
    DurationOption {
        id: "5min",
        label: "5 min",
        seconds: 5.0 * 60.0,
    },
    DurationOption {
        id: "7min",
        label: "7 min",
        seconds: 7.0 * 60.0,
    },
    DurationOption {
        id: "10min",
        label: "10 min",
        seconds: 10.0 * 60.0,
    },
    DurationOption {
        id: "15min",
        label: "15 min",
        seconds: 15.0 * 60.0,
    },
];

/// Default session length: the 5 minute option.
pub const DEFAULT_SESSION_SECS: f64 = SESSION_DURATIONS[1].seconds;

/// Bounds accepted for a custom session length, in minutes.
pub const CUSTOM_MINUTES_MIN: f64 = 1.0;
pub const CUSTOM_MINUTES_MAX: f64 = 60.0;

pub fn find_duration(id: &str) -> Option<&'static DurationOption> {
    SESSION_DURATIONS.iter().find(|d| d.id == id)
}

/// Convert a custom session length in minutes to seconds.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidValue`] unless `minutes` is finite and
/// within [`CUSTOM_MINUTES_MIN`]..=[`CUSTOM_MINUTES_MAX`].
pub fn custom_minutes(minutes: f64) -> Result<f64, ValidationError> {
    if minutes.is_finite() && (CUSTOM_MINUTES_MIN..=CUSTOM_MINUTES_MAX).contains(&minutes) {
        Ok(minutes * 60.0)
    } else {
        Err(ValidationError::InvalidValue {
            field: "minutes".into(),
            message: format!(
                "expected {CUSTOM_MINUTES_MIN}..={CUSTOM_MINUTES_MAX} minutes, got {minutes}"
            ),
        })
    }
}

/// Range of seconds-per-phase a user may pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pace {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Default for Pace {
    fn default() -> Self {
        Self {
            min: 3.0,
            max: 8.0,
            step: 0.5,
            default: DEFAULT_PACE_SECS,
        }
    }
}

impl Pace {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && (self.min..=self.max).contains(&value)
    }

    /// Whether `value` sits on a step boundary counted from `min`.
    pub fn on_step(&self, value: f64) -> bool {
        let steps = (value - self.min) / self.step;
        (steps - steps.round()).abs() < 1e-9
    }

    /// Accept `value` only if it is inside the bounds and on a step.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] when out of range or
    /// between steps.
    pub fn validate(&self, value: f64) -> Result<f64, ValidationError> {
        if self.contains(value) && self.on_step(value) {
            Ok(value)
        } else {
            Err(ValidationError::InvalidValue {
                field: "pace".into(),
                message: format!(
                    "expected {}..={} seconds per phase in {} second steps, got {value}",
                    self.min, self.max, self.step
                ),
            })
        }
    }
}
