//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Validate a socket address in `ip:port` form
pub fn validate_socket_address(address: &str) -> Result<String, String> {
    let address = address.trim();

    let parsed: SocketAddr = address.parse().map_err(|_| {
        format!(
            "Address must be an IP address and port such as 0.0.0.0:8080, got: '{}'",
            address
        )
    })?;

    if parsed.port() == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(address.to_string())
}

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}
