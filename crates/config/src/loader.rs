use crate::schema::{SchemaViolation, validate};
use crate::types::{Config, Profile};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_JSON: &str = include_str!("../../../assets/remote-process.default.json");

/// Error type for profile loading operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home directory not found.
    #[error("could not determine home directory")]
    NoHomeDir,

    /// Config file I/O error.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    /// Config is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Config schema validation error.
    #[error("config validation failed: {}", format_validation_errors(.0))]
    ValidationFailed(Vec<SchemaViolation>),

    /// No profile with the requested name.
    #[error("no profile named '{0}'")]
    ProfileNotFound(String),

    /// Profile values rejected by the command builder.
    #[error("invalid profile: {0}")]
    Ssh(#[from] ssh::Error),
}

fn format_validation_errors(errors: &[SchemaViolation]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Returns the default config file path (~/.remote-process.json).
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".remote-process.json"))
}

/// Ensures the config file exists at `path`, writing the default if missing.
///
/// # Errors
///
/// Returns an error if writing the default config file fails.
pub fn ensure_config_exists(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        fs::write(path, DEFAULT_JSON)?;
        info!(path = %path.display(), "created default config");
    }

    Ok(())
}

/// Loads config from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or fails schema validation.
pub fn load_from_str(s: &str) -> Result<Config, ConfigError> {
    s.parse()
}

/// Loads config from a specific path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the config is invalid.
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// Loads config from the default path (~/.remote-process.json).
///
/// A missing file yields an empty config.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the config is invalid.
pub fn load() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoHomeDir)?;

    if !path.exists() {
        return Ok(Config::default());
    }

    load_from_path(&path)
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;

        validate(&value).map_err(ConfigError::ValidationFailed)?;

        Ok(serde_json::from_value(value)?)
    }
}

impl Config {
    /// Looks up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ProfileNotFound` if no profile has that name.
    pub fn require_profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profile(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }
}
