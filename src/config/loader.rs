//! Configuration loader for reasonable-excuse
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from the KDL file and the environment with proper precedence.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};

use crate::config::error::ConfigError;
use crate::config::kdl::KdlFormat;
use crate::config::settings::Settings;

/// Environment variable for the configuration file path
pub const CONFIG_FILE_ENV: &str = "REASONABLE_EXCUSE_CONFIG_FILE";

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.kdl";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "REASONABLE_EXCUSE";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader
///
/// Sources, in order of priority:
/// 1. The KDL configuration file (required)
/// 2. `REASONABLE_EXCUSE_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration file path
    config_file: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the file named by `REASONABLE_EXCUSE_CONFIG_FILE`,
    /// falling back to `config.kdl`
    pub fn new() -> Self {
        let config_file = std::env::var(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self { config_file }
    }

    /// Create a loader for an explicit file path
    pub fn with_file<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_file: path.into(),
        }
    }

    /// Get the configuration file path
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file is not found
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Build the config::Config instance from all sources
    fn build_config(&self) -> Result<Config, ConfigError> {
        if !self.config_file.is_file() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                self.config_file.display()
            )));
        }

        let path = self.config_file.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!(
                "Configuration path is not valid UTF-8: {}",
                self.config_file.display()
            ))
        })?;

        // REASONABLE_EXCUSE_UPLOAD__TARGET_DIR -> upload.target_dir
        Config::builder()
            .add_source(File::new(path, KdlFormat::default()).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::from)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
