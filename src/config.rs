//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (platform config dir, or `--config <FILE>`)
//! 3. `DUPEKEEP_*` environment variables
//! 4. CLI flags (applied by the caller)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::PolicyArg;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPEKEEP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delete permanently instead of moving to trash.
    pub permanent: bool,
    /// Policy used by `select` when neither `--policy` nor `--pattern` is given.
    pub default_policy: PolicyArg,
    /// Show progress bars for batch operations.
    pub show_progress: bool,
    /// Skip the confirmation prompt before deleting.
    pub skip_confirmation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            permanent: false,
            default_policy: PolicyArg::Identical,
            show_progress: true,
            skip_confirmation: false,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults if the file is unreadable or invalid.
    pub fn load() -> Self {
        match Self::load_from(None) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration, reading `path` instead of the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` does not exist, the file is not
    /// valid TOML for this configuration, or an environment variable has the
    /// wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = match path {
            Some(p) if !p.is_file() => {
                anyhow::bail!("Config file not found: {}", p.display());
            }
            Some(p) => Some(p.to_path_buf()),
            None => Self::config_path().ok(),
        };
        if let Some(file) = file {
            log::debug!("Reading config from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Invalid configuration")
    }

    /// Save the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupekeep", "dupekeep")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
