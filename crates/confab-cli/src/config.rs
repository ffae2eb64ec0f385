//! Host configuration loaded from ~/.config/confab/config.toml.
//!
//! Every field has a command-line override; a missing file means an empty
//! config, a malformed one is an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    pub base_url: Option<String>,
    pub csrf_token: Option<String>,
    pub page: Option<String>,
    pub markdown: Option<bool>,
}

impl CliConfig {
    /// Loads the default config file, or an empty config when none exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("could not parse config at {}", path.display()))
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("confab").join("config.toml"))
    }
}
