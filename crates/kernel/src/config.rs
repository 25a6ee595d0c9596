//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of `*.links.menu.yml` provider files (default: ./menu_links).
    pub menu_links_dir: PathBuf,

    /// Active config directory holding the stored groups (default: ./config/active).
    pub active_config_dir: PathBuf,

    /// Sync directory used by config import/export (default: ./config/sync).
    pub sync_config_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            menu_links_dir: dir_var("MENU_LINKS_DIR", "./menu_links")?,
            active_config_dir: dir_var("ACTIVE_CONFIG_DIR", "./config/active")?,
            sync_config_dir: dir_var("SYNC_CONFIG_DIR", "./config/sync")?,
        })
    }
}

fn dir_var(name: &str, default: &str) -> Result<PathBuf> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(PathBuf::from(default)),
        Ok(value) => Ok(PathBuf::from(value)),
        Err(env::VarError::NotPresent) => Ok(PathBuf::from(default)),
        Err(e) => Err(e).with_context(|| format!("{name} must be valid UTF-8")),
    }
}
