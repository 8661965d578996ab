//! Centralized path management for urilaunch.
//!
//! The config directory is resolved once and cached. `URILAUNCH_CONFIG_DIR`
//! overrides it for the whole process.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "URILAUNCH_CONFIG_DIR";

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// ~/.config/urilaunch (or platform equivalent)
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        std::env::var_os(CONFIG_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_config_dir)
    })
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("urilaunch")
}

/// Config file path: config_dir()/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
