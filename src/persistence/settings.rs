use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_blob_count() -> usize {
    6
}

fn default_true() -> bool {
    true
}

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Number of drifting circles in the background
    #[serde(default = "default_blob_count")]
    pub blob_count: usize,

    /// Ask before wiping the whole list
    #[serde(default = "default_true")]
    pub confirm_clear_all: bool,

    #[serde(default = "default_true")]
    pub show_background: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            blob_count: default_blob_count(),
            confirm_clear_all: true,
            show_background: true,
        }
    }
}

/// Load settings from settings.json, falling back to defaults when the file is missing
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: AppSettings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &AppSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
