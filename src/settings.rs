//! Runtime settings
//!
//! Settings live in `settings.json` inside the app config directory. A
//! missing file means defaults; a present file must parse and validate.

use crate::session::record::{default_roster, RosterEntry};
use crate::session::SynthesisConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File name inside the app config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings-related errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewSettings {
    /// Camera index or name; first camera when unset
    pub device_id: Option<String>,
    pub fps: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            device_id: None,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorSettings {
    /// Delay before simulated recognition results show up
    pub synthesis_delay_ms: u64,
    pub preview: PreviewSettings,
    /// People the simulated recognizer reports on every camera
    pub roster: Vec<RosterEntry>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            synthesis_delay_ms: 2000,
            preview: PreviewSettings::default(),
            roster: default_roster(),
        }
    }
}

impl MonitorSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.roster.is_empty() {
            return Err(SettingsError::Invalid("roster must not be empty".to_string()));
        }
        if let Some(entry) = self
            .roster
            .iter()
            .find(|e| !(0.0..=1.0).contains(&e.confidence))
        {
            return Err(SettingsError::Invalid(format!(
                "confidence for '{}' must be between 0 and 1, got {}",
                entry.name, entry.confidence
            )));
        }
        if self.preview.fps == 0 {
            return Err(SettingsError::Invalid("preview fps must be positive".to_string()));
        }
        Ok(())
    }

    pub fn synthesis(&self) -> SynthesisConfig {
        SynthesisConfig {
            delay: Duration::from_millis(self.synthesis_delay_ms),
            roster: self.roster.clone(),
        }
    }
}

/// Read settings from a config directory
pub fn load_settings(config_dir: &Path) -> Result<MonitorSettings, SettingsError> {
    let path = config_dir.join(SETTINGS_FILE);
    if !path.exists() {
        tracing::debug!("No settings at {:?}, using defaults", path);
        return Ok(MonitorSettings::default());
    }

    let content = fs::read_to_string(&path)?;
    let settings: MonitorSettings = serde_json::from_str(&content)?;
    settings.validate()?;

    tracing::debug!("Loaded settings from {:?}", path);
    Ok(settings)
}

/// Write settings to a config directory, creating it if needed
pub fn save_settings(settings: &MonitorSettings, config_dir: &Path) -> Result<(), SettingsError> {
    settings.validate()?;
    fs::create_dir_all(config_dir)?;

    let content = serde_json::to_string_pretty(settings)?;
    fs::write(config_dir.join(SETTINGS_FILE), content)?;
    Ok(())
}
