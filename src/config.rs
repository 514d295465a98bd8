//! Skilldeck Configuration
//!
//! Loads and saves the manager's configuration from `~/.skilldeck/config.json`.
//! The config holds the ordered list of search paths; a missing or corrupt
//! file is treated as an empty configuration so callers never fail on read.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Directory under the user's home that holds the config file.
const CONFIG_DIR: &str = ".skilldeck";

/// Config file name within the skilldeck directory.
const CONFIG_FILENAME: &str = "config.json";

/// Persisted configuration record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Ordered, deduplicated list of directories to scan for skills.
    #[serde(default)]
    pub search_paths: Vec<String>,

    /// Placeholder for a future incremental-scan timestamp. Always written,
    /// never read.
    #[serde(default)]
    pub last_scan: Option<String>,
}

/// Returns the default config file path: `~/.skilldeck/config.json`.
pub fn default_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    home.join(CONFIG_DIR).join(CONFIG_FILENAME)
}

/// Load the configuration from `path`.
///
/// A missing file, unreadable file, or invalid JSON all yield the default
/// (empty) configuration. Read failures are logged at debug level only.
pub fn load_config(path: &Path) -> ManagerConfig {
    if !path.exists() {
        return ManagerConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("failed to read config {}: {}", path.display(), e);
            return ManagerConfig::default();
        }
    };

    match serde_json::from_str::<ManagerConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            debug!("failed to parse config {}: {}", path.display(), e);
            ManagerConfig::default()
        }
    }
}

/// Save the configuration to `path`, creating parent directories as needed.
///
/// The file is rewritten wholesale on every call.
pub fn save_config(path: &Path, config: &ManagerConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, &json)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    Ok(())
}

/// Resolve a path that may start with `~` to an absolute path.
///
/// If the path starts with `~`, the tilde is replaced with the user's home
/// directory. Otherwise the path is returned as-is.
pub fn resolve_path(p: &str) -> String {
    if let Some(rest) = p.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        home.join(rest).to_string_lossy().to_string()
    } else {
        p.to_string()
    }
}
