//! Settings loader for `config.toml`

use super::types::Settings;
use netwatch_core::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const NETWATCH_DIR: &str = "netwatch";

/// Default settings location: `<config_dir>/netwatch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(NETWATCH_DIR).join(CONFIG_FILENAME))
}

/// Read and parse a settings file
pub fn try_load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::config_invalid(format!("{}: {}", path.display(), e)))
}

/// Load settings, falling back to defaults when the file is missing or invalid
pub fn load_settings(path: &Path) -> Settings {
    match try_load_settings(path) {
        Ok(settings) => {
            debug!("Loaded settings from {:?}", path);
            settings
        }
        Err(Error::ConfigNotFound { .. }) => {
            debug!("No config file at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            warn!("Failed to load {:?}: {}", path, e);
            Settings::default()
        }
    }
}
