//! Front-end configuration.
//!
//! Read from TOML. An explicit `--config` path must exist; without one the
//! default location is used when present, and built-in defaults apply when
//! it is not.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use lantern_core::config::ConsoleConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub console: ConsoleConfig,
}

/// The default configuration file location (e.g.,
/// `~/.config/lantern/config.toml`).
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lantern").join("config.toml"))
}

pub fn load(explicit: Option<&Path>) -> Result<FrontendConfig, Box<dyn Error>> {
    match explicit {
        Some(path) => parse_file(path),
        None => match default_path() {
            Some(path) if path.is_file() => parse_file(&path),
            _ => Ok(FrontendConfig::default()),
        },
    }
}

fn parse_file(path: &Path) -> Result<FrontendConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}
