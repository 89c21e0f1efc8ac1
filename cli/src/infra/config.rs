//! Loading configuration from disk and the environment.
//!
//! - the build config is JSON in the project directory
//! - tool settings are YAML under the home directory; a missing file means defaults
//! - credentials and switches come from environment variables through `envy`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{BuildConfig, EnvSettings, ToolSettings};

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "CFDEPLOY_SETTINGS";

/// Read and parse the build config.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_build_config(path: &Path) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read build config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("cannot parse build config {}", path.display()))
}

/// Location of the tool settings file.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn settings_path() -> Result<PathBuf> {
    if let Ok(val) = std::env::var(SETTINGS_PATH_ENV) {
        return Ok(PathBuf::from(val));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".cfdeploy").join("settings.yaml"))
}

/// Load the tool settings, or defaults when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings() -> Result<ToolSettings> {
    let path = settings_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file; using defaults");
        return Ok(ToolSettings::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

/// Read credentials and switches from the process environment.
///
/// # Errors
///
/// Returns an error if a variable is present but not valid Unicode.
pub fn load_env() -> Result<EnvSettings> {
    envy::from_env::<EnvSettings>().context("cannot read environment")
}
