//! Config file loading and saving.
//!
//! Order: defaults → JSON file → environment overrides.

use std::path::{Path, PathBuf};

use scout_types::{Result, ScoutError, config::ScoutConfig};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "scout.json";
/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SCOUT_CONFIG";
pub const BACKEND_URL_ENV: &str = "SCOUT_BACKEND_URL";
pub const DATABASE_PATH_ENV: &str = "SCOUT_DATABASE_PATH";

/// Where the config file lives: `$SCOUT_CONFIG` or `./scout.json`.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE))
}

/// Load the effective configuration from the process environment.
pub fn load_config() -> ScoutConfig {
    load_config_from(&config_path(), |key| std::env::var(key).ok())
}

/// Load from `path`, then apply overrides read through `env`.
///
/// A missing file yields defaults. A malformed file is logged and
/// replaced by defaults.
pub fn load_config_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> ScoutConfig {
    let mut config = match read_config_file(path) {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Ok(None) => {
            log::debug!("No config file at {}, using defaults", path.display());
            ScoutConfig::default()
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            ScoutConfig::default()
        }
    };
    apply_env_overrides(&mut config, env);
    config
}

/// Parse a config file. `Ok(None)` when the file does not exist.
pub fn read_config_file(path: &Path) -> Result<Option<ScoutConfig>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ScoutError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| ScoutError::Config(format!("Malformed config {}: {}", path.display(), e)))
}

pub fn apply_env_overrides(config: &mut ScoutConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(url) = env(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
        log::debug!("Backend endpoint overridden by {}", BACKEND_URL_ENV);
        config.backend.endpoint = url.trim().to_string();
    }
    if let Some(path) = env(DATABASE_PATH_ENV).filter(|v| !v.trim().is_empty()) {
        log::debug!("Database path overridden by {}", DATABASE_PATH_ENV);
        config.storage.database_path = path.trim().to_string();
    }
}

/// Write `config` to `path` as pretty JSON.
pub fn save_config(path: &Path, config: &ScoutConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .map_err(|e| ScoutError::Config(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Saved config to {}", path.display());
    Ok(())
}
