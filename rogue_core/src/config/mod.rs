//! Configuration loading from TOML files

mod constants;
mod procs;

pub use constants::{CombatTableConstants, GameConstants, RatingConstants, TargetConstants};
pub use procs::{default_catalog, load_proc_catalog, parse_proc_catalog, ProcCatalog};

use crate::build::Build;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
    #[error("Unknown {kind}: {name}")]
    UnknownEntry { kind: &'static str, name: String },
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load a build file. Proc names resolve against the default catalog.
pub fn load_build(path: &Path) -> Result<Build, ConfigError> {
    let build: Build = load_toml(path)?;
    validate_build(&build)?;
    Ok(build)
}

/// Parse a build from a TOML string
pub fn parse_build(content: &str) -> Result<Build, ConfigError> {
    let build: Build = parse_toml(content)?;
    validate_build(&build)?;
    Ok(build)
}

fn validate_build(build: &Build) -> Result<(), ConfigError> {
    for (hand, weapon) in [("main hand", &build.stats.mh), ("off hand", &build.stats.oh)] {
        if weapon.speed <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{} weapon speed must be positive",
                hand
            )));
        }
    }
    let settings = &build.settings;
    if settings.duration <= 0.0 {
        return Err(ConfigError::ValidationError(
            "fight duration must be positive".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&settings.time_in_execute_range) {
        return Err(ConfigError::ValidationError(
            "time_in_execute_range must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}
