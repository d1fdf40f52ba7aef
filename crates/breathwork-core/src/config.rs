//! TOML-based application configuration.
//!
//! Holds the defaults a session starts from:
//! - Breathing pace and session length
//! - Whether phase cues are spoken
//! - Tick and render intervals for the terminal driver
//!
//! Configuration is read from `~/.config/breathwork/config.toml`. The file
//! is never written; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ValidationError};
use crate::presets::{Pace, DEFAULT_PACE_SECS, DEFAULT_SESSION_SECS};
use crate::session::SessionConfig;

/// Session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_phase_duration")]
    pub phase_duration_secs: f64,
    #[serde(default = "default_session_duration")]
    pub session_duration_secs: f64,
}

/// Spoken cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub speech_enabled: bool,
}

/// Terminal driver timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How often the clock is sampled.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// How often the status line is redrawn.
    #[serde(default = "default_render_interval")]
    pub render_interval_ms: u64,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_phase_duration() -> f64 {
    DEFAULT_PACE_SECS
}
fn default_session_duration() -> f64 {
    DEFAULT_SESSION_SECS
}
fn default_true() -> bool {
    true
}
fn default_tick_interval() -> u64 {
    16
}
fn default_render_interval() -> u64 {
    250
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            phase_duration_secs: default_phase_duration(),
            session_duration_secs: default_session_duration(),
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            speech_enabled: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            render_interval_ms: default_render_interval(),
        }
    }
}

/// Returns `~/.config/breathwork[-dev]/` based on BREATHWORK_ENV.
///
/// Set BREATHWORK_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("BREATHWORK_ENV").unwrap_or_else(|_| "production".to_string());

    Ok(if env == "dev" {
        base_dir.join("breathwork-dev")
    } else {
        base_dir.join("breathwork")
    })
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Session config from the configured defaults, with `pace` and
    /// `session_secs` taking precedence when given.
    ///
    /// # Errors
    ///
    /// Returns an error if either duration is not positive or the pace is
    /// outside [`Pace`] bounds or between its steps.
    pub fn session_config(
        &self,
        pace: Option<f64>,
        session_secs: Option<f64>,
    ) -> Result<SessionConfig, ValidationError> {
        let pace = Pace::default().validate(pace.unwrap_or(self.session.phase_duration_secs))?;
        SessionConfig::new(
            pace,
            session_secs.unwrap_or(self.session.session_duration_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.phase_duration_secs, 4.0);
        assert_eq!(parsed.session.session_duration_secs, 300.0);
        assert!(parsed.cues.speech_enabled);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.display.tick_interval_ms, 16);
        assert_eq!(cfg.display.render_interval_ms, 250);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\nphase_duration_secs = 6.5\n\n[cues]\nspeech_enabled = false").unwrap();
        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.session.phase_duration_secs, 6.5);
        assert_eq!(cfg.session.session_duration_secs, 300.0);
        assert!(!cfg.cues.speech_enabled);
        assert_eq!(cfg.display.tick_interval_ms, 16);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session\nphase_duration_secs = ").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cues.speech_enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("display.render_interval_ms").as_deref(), Some("250"));
        assert_eq!(cfg.get("session.phase_duration_secs").as_deref(), Some("4.0"));
        assert!(cfg.get("session.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn session_config_validates_pace() {
        let mut cfg = Config::default();
        let session = cfg.session_config(None, None).unwrap();
        assert_eq!(session.phase_duration_secs, 4.0);
        assert_eq!(session.session_duration_secs, 300.0);

        cfg.session.phase_duration_secs = 12.0;
        assert!(cfg.session_config(None, None).is_err());
        assert!(cfg.session_config(Some(4.2), None).is_err());

        cfg.session.phase_duration_secs = 4.0;
        cfg.session.session_duration_secs = 0.0;
        assert!(cfg.session_config(None, None).is_err());
    }

    #[test]
    fn session_config_overrides_win() {
        let mut cfg = Config::default();
        cfg.session.phase_duration_secs = 12.0;
        let session = cfg.session_config(Some(6.5), Some(90.0)).unwrap();
        assert_eq!(session.phase_duration_secs, 6.5);
        assert_eq!(session.session_duration_secs, 90.0);
    }
}
