pub mod config;
pub mod presets;
pub mod run;
pub mod simulate;

use std::path::Path;

use breathwork_core::error::Result;
use breathwork_core::Config;

/// Load the config from `path` when given, otherwise from the default
/// location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}
