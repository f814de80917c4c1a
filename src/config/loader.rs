// Configuration loader
// Defaults, then ~/.homerun/config.toml, then environment variables

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::constants::*;
use super::settings::Settings;

/// Load settings from the user's config file and the process environment.
pub fn load_settings() -> Result<Settings> {
    let config_path = dirs::home_dir()
        .map(|home| home.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    load_settings_from(config_path.as_deref(), |key| std::env::var(key).ok())
}

/// Load settings from an explicit config path and environment lookup.
///
/// A missing file is not an error. Empty environment values are ignored.
pub fn load_settings_from<F>(config_path: Option<&Path>, env: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = match config_path {
        Some(path) if path.exists() => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!("Loaded configuration from {}", path.display());
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        _ => Settings::default(),
    };

    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(ENV_API_KEY) {
        settings.api_key = Some(key);
    }
    if let Some(model) = non_empty(ENV_MODEL) {
        settings.model = model;
    }
    if let Some(dir) = non_empty(ENV_DATA_DIR) {
        settings.data_dir = PathBuf::from(dir);
    }

    // An empty key in the file counts as no key
    if settings
        .api_key
        .as_deref()
        .is_some_and(|k| k.trim().is_empty())
    {
        settings.api_key = None;
    }

    settings
        .validate()
        .context("Configuration validation failed")?;

    Ok(settings)
}
