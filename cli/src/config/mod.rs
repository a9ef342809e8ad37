//! # Repository Configuration
//!
//! Two files make up a repository's configuration:
//!
//! 1. **Setup config** (any path, passed to `setup`)
//!    - Host, distribution metadata, signing key
//!    - JSON, YAML or TOML, chosen by file extension (YAML when unknown)
//!
//! 2. **Settings** (`<state-dir>/<name>/settings.yaml`)
//!    - Written by `setup`, read by every other command
//!    - Host and optional serving password
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let config = load_repo_config(Path::new("repo.yaml"))?;
//! save_settings(&paths.settings_file(), &RepoSettings { host: config.host, password: None })?;
//! ```

mod repo;
mod settings;

pub use repo::{Host, RepoConfig};
pub use settings::RepoSettings;

use anyhow::{Context, Result};
use std::path::Path;

use crate::error::ConfigError;

/// Load and validate a setup config file
pub fn load_repo_config(path: &Path) -> Result<RepoConfig> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parse_error = |message: String| ConfigError::ParseError {
        path: path.display().to_string(),
        message,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let config: RepoConfig = match extension.as_deref() {
        Some("json") => {
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        }
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    config.validate()?;
    Ok(config)
}

/// Load persisted repository settings
pub fn load_settings(path: &Path) -> Result<RepoSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).map_err(|e| {
        ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Persist repository settings
pub fn save_settings(path: &Path, settings: &RepoSettings) -> Result<()> {
    let yaml = serde_yaml::to_string(settings).context("Failed to serialize settings")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))
}
