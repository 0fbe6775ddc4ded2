//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.
//! Checks that touch the filesystem (target directory, token file) run when
//! the services are built, not here.

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use regex::Regex;
use reqwest::Url;
use tracing_subscriber::EnvFilter;

use crate::api::handlers::health::HEALTH_ROUTE;
use crate::config::error::ConfigError;
use crate::config::settings::{
    CalendarSettings, ClientSettings, FireflySettings, LoggerSettings, Settings, UploadSettings,
};

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Upper bound for generated upload names
pub const MAX_FILENAME_LENGTH: usize = 128;

fn validate_route(field: &str, route: &str) -> Result<(), ConfigError> {
    if !route.starts_with('/') {
        return Err(ConfigError::validation(
            field,
            format!("Route '{}' must start with '/'.", route),
        ));
    }

    // Routes are literal paths; capture syntax would make the router panic
    if route.contains(['{', '}']) {
        return Err(ConfigError::validation(
            field,
            format!("Route '{}' must not contain '{{' or '}}'.", route),
        ));
    }
    if route
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(ConfigError::validation(
            field,
            format!("Route '{}' has a segment starting with ':' or '*'.", route),
        ));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::validation(field, format!("Invalid URL '{}': {}", value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::validation(
            field,
            format!("Unsupported URL scheme '{}'. Expected http or https.", scheme),
        )),
    }
}

impl UploadSettings {
    /// Validate upload settings
    ///
    /// # Validation Rules
    /// - Route must be a literal path starting with `/`
    /// - Target directory must not be empty
    /// - Filename length must be between 1 and 128
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_route("upload.route", &self.route)?;

        if self.target_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "upload.target_dir",
                "Target directory is required.",
            ));
        }

        if self.filename_length == 0 || self.filename_length > MAX_FILENAME_LENGTH {
            return Err(ConfigError::validation(
                "upload.filename_length",
                format!(
                    "Filename length must be between 1 and {}, got {}.",
                    MAX_FILENAME_LENGTH, self.filename_length
                ),
            ));
        }

        Ok(())
    }
}

impl FireflySettings {
    /// Validate Firefly settings
    ///
    /// # Validation Rules
    /// - Route must be a literal path starting with `/`
    /// - Firefly URL must be an http(s) URL
    /// - PAT file must not be empty
    /// - Shortcut labels must be non-empty and unique
    /// - Default amounts must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_route("firefly_shortcuts.route", &self.route)?;
        validate_http_url("firefly_shortcuts.firefly_url", &self.firefly_url)?;

        if self.pat_file.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "firefly_shortcuts.pat_file",
                "PAT file path is required.",
            ));
        }

        let mut labels = HashSet::new();
        for (index, shortcut) in self.shortcuts.iter().enumerate() {
            let field = format!("firefly_shortcuts.shortcut[{}]", index);

            if shortcut.label.trim().is_empty() {
                return Err(ConfigError::validation(field, "Shortcut label is required."));
            }

            if !labels.insert(shortcut.label.as_str()) {
                return Err(ConfigError::validation(
                    field,
                    format!("Duplicate shortcut label '{}'.", shortcut.label),
                ));
            }

            if let Some(amount) = shortcut.amount
                && !(amount.is_finite() && amount > 0.0)
            {
                return Err(ConfigError::validation(
                    format!("{}.amount", field),
                    format!("Amount must be a positive number, got {}.", amount),
                ));
            }
        }

        Ok(())
    }
}

impl CalendarSettings {
    /// Validate calendar settings
    ///
    /// # Validation Rules
    /// - Route must be a literal path starting with `/`
    /// - Base URL must be an http(s) URL
    /// - Pass parameter must not be empty
    /// - Filter must be a valid regular expression
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_route("calendar.route", &self.route)?;
        validate_http_url("calendar.base_url", &self.base_url)?;

        if self.pass_param.trim().is_empty() {
            return Err(ConfigError::validation(
                "calendar.pass_param",
                "Pass parameter name is required.",
            ));
        }

        Regex::new(&self.filter).map_err(|e| {
            ConfigError::validation("calendar.filter", format!("Invalid filter regex: {}", e))
        })?;

        Ok(())
    }
}

impl ClientSettings {
    /// Validate client settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "client.timeout",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "client.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Level must be a valid `EnvFilter` directive
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.level).map_err(|e| {
            ConfigError::validation(
                "logger.level",
                format!("Invalid log level '{}': {}", self.level, e),
            )
        })?;

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_address()?;

        if let Some(origin) = &self.allow_origin
            && origin != "*"
        {
            HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::validation(
                    "allow_origin",
                    format!("'{}' is not a valid header value.", origin),
                )
            })?;
        }

        if let Some(upload) = &self.upload {
            upload.validate()?;
        }
        if let Some(firefly) = &self.firefly_shortcuts {
            firefly.validate()?;
        }
        if let Some(calendar) = &self.calendar {
            calendar.validate()?;
        }

        self.validate_distinct_routes()?;
        self.client.validate()?;
        self.logger.validate()?;
        Ok(())
    }

    /// Parse the configured bind address
    pub fn socket_address(&self) -> Result<SocketAddr, ConfigError> {
        self.address.parse::<SocketAddr>().map_err(|e| {
            ConfigError::validation(
                "address",
                format!("Could not parse server address '{}': {}", self.address, e),
            )
        })
    }

    /// All mounted paths, paired with the setting that produced them
    pub fn mounted_routes(&self) -> Vec<(&'static str, String)> {
        let mut routes = vec![("health", HEALTH_ROUTE.to_string())];

        if let Some(upload) = &self.upload {
            routes.push(("upload.route", upload.route.clone()));
        }
        if let Some(firefly) = &self.firefly_shortcuts {
            routes.push(("firefly_shortcuts.route", firefly.shortcuts_route()));
            routes.push(("firefly_shortcuts.route", firefly.add_transaction_route()));
        }
        if let Some(calendar) = &self.calendar {
            routes.push(("calendar.route", calendar.route.clone()));
        }

        routes
    }

    fn validate_distinct_routes(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (field, route) in self.mounted_routes() {
            if !seen.insert(route.clone()) {
                return Err(ConfigError::validation(
                    field,
                    format!("Route '{}' is mounted more than once.", route),
                ));
            }
        }
        Ok(())
    }
}
