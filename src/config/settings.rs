//! Configuration settings structures for reasonable-excuse
//!
//! This module defines all configuration structures that can be loaded from
//! the KDL configuration file and environment variables. Keys use the
//! snake_case form produced by [`KdlFormat`](crate::config::KdlFormat), so
//! `filename-length` in the file is `filename_length` here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/reasonable-excuse.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Socket address the listener binds to, e.g. `0.0.0.0:8080`
    #[serde(default = "default_address")]
    pub address: String,

    /// Value sent as `Access-Control-Allow-Origin`; `*` allows any origin
    #[serde(default)]
    pub allow_origin: Option<String>,

    /// File upload route group
    #[serde(default)]
    pub upload: Option<UploadSettings>,

    /// Firefly III shortcut route group
    #[serde(default)]
    pub firefly_shortcuts: Option<FireflySettings>,

    /// Filtered iCal proxy route group
    #[serde(default)]
    pub calendar: Option<CalendarSettings>,

    /// Outbound HTTP client settings
    #[serde(default)]
    pub client: ClientSettings,

    /// Logger settings
    #[serde(default)]
    pub logger: LoggerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: default_address(),
            allow_origin: None,
            upload: None,
            firefly_shortcuts: None,
            calendar: None,
            client: ClientSettings::default(),
            logger: LoggerSettings::default(),
        }
    }
}

// ============================================================================
// Route Group Settings
// ============================================================================

/// Upload route group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Route path, e.g. `/upload`
    pub route: String,

    /// Directory uploaded files are written to; must already exist
    pub target_dir: PathBuf,

    /// Length of the generated part of stored file names
    pub filename_length: usize,
}

/// Firefly III shortcut route group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireflySettings {
    /// Route prefix; `/shortcuts` and `/add-transaction` are mounted below it
    pub route: String,

    /// Base URL of the Firefly III instance
    pub firefly_url: String,

    /// File containing the personal access token
    pub pat_file: PathBuf,

    /// Configured shortcuts, in declaration order
    #[serde(rename = "shortcut", default)]
    pub shortcuts: Vec<ShortcutSettings>,
}

impl FireflySettings {
    /// Route listing the shortcuts
    pub fn shortcuts_route(&self) -> String {
        format!("{}/shortcuts", self.route.trim_end_matches('/'))
    }

    /// Route submitting a shortcut as a transaction
    pub fn add_transaction_route(&self) -> String {
        format!("{}/add-transaction", self.route.trim_end_matches('/'))
    }
}

/// A pre-filled withdrawal template
///
/// ```kdl
/// shortcut "Coffee" icon="☕" {
///     name "Coffee"
///     source "Checking"
///     destination "Cafe"
///     amount 3.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutSettings {
    /// Label shown to the user (the node's positional argument)
    #[serde(rename = "argument")]
    pub label: String,

    /// Icon shown next to the label
    #[serde(default)]
    pub icon: String,

    /// Transaction description
    pub name: String,

    /// Source account name
    pub source: String,

    /// Destination account name
    pub destination: String,

    /// Default amount; a request may override it
    #[serde(default)]
    pub amount: Option<f64>,

    /// Budget name, resolved to an id when the transaction is stored
    #[serde(default)]
    pub budget: Option<String>,

    /// Category name
    #[serde(default)]
    pub category: Option<String>,
}

/// Filtered iCal proxy route group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Route path, e.g. `/calendar`
    pub route: String,

    /// Upstream iCal URL
    pub base_url: String,

    /// Query parameter forwarded to the upstream
    pub pass_param: String,

    /// Regular expression; every match is removed from the feed
    pub filter: String,
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Outbound HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Filter directive, e.g. `info` or `info,reasonable_excuse=trace`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        Ok(FileConfig::new(
            self.enabled,
            PathBuf::from(self.path),
            self.append,
            format,
        ))
    }
}
