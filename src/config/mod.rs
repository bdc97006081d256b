pub mod cli;

pub use cli::Cli;

use crate::models::BatchConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "kami-batch.yaml";

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// No file at the config path; built-in defaults
    Defaults,
}

/// Configuration manager for loading and saving the YAML batch configuration.
///
/// The file is optional: when it does not exist the built-in defaults are used,
/// which point the batch at `3ds_levels` / `3ds_solutions` and `./kamiSolver`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for the given config file path.
    pub fn new<P: AsRef<Utf8Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }

    /// Load the batch configuration.
    ///
    /// Nothing is logged here: the log directory itself comes from this
    /// config, so the caller reports the [`ConfigOrigin`] through
    /// [`log_origin`](Self::log_origin) once logging is up.
    ///
    /// # Returns
    /// The loaded BatchConfig, or default if file doesn't exist
    pub fn load_config(&self) -> Result<(BatchConfig, ConfigOrigin)> {
        if !self.config_path.exists() {
            return Ok((BatchConfig::default(), ConfigOrigin::Defaults));
        }

        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: BatchConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        Ok((config, ConfigOrigin::File))
    }

    /// Log where the configuration returned by `load_config` came from
    pub fn log_origin(&self, origin: ConfigOrigin) {
        match origin {
            ConfigOrigin::File => tracing::info!("Loaded config from {}", self.config_path),
            ConfigOrigin::Defaults => tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            ),
        }
    }

    /// Save the batch configuration, creating the parent directory if needed.
    pub fn save_config(&self, config: &BatchConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {}", parent))?;
            }
        }

        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}
