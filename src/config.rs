// Settings file loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::ProfileFields;
use crate::report::OutputFormat;

const APP_NAME: &str = "mangodiag";

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Defaults for every run, overridden by environment variables and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagSettings {
    pub uri: String,
    pub database: Option<String>,
    pub connect_timeout_secs: u64,
    pub format: OutputFormat,
    pub profile: ProfileFields,
}

impl Default for DiagSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            format: OutputFormat::default(),
            profile: ProfileFields::default(),
        }
    }
}

/// Locates and reads the settings file
#[derive(Clone, Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    const SETTINGS_FILE: &'static str = "settings.json";

    /// Use the platform config directory. Nothing is created on disk.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .context("Could not determine config directory")?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(Self::SETTINGS_FILE)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_settings(&self) -> Result<DiagSettings> {
        Ok(load_json(&self.settings_path())?.unwrap_or_default())
    }
}

/// Load settings from an explicit path, which must exist.
pub fn load_settings_from(path: &Path) -> Result<DiagSettings> {
    load_json(path)?.with_context(|| format!("Config file {} not found", path.display()))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let value: T = serde_json::from_str(&data)
        .with_context(|| format!("Failed to deserialize {}", path.display()))?;

    log::debug!("Loaded settings from {}", path.display());
    Ok(Some(value))
}
