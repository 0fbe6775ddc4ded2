//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Personal HTTP gateway: file uploads, Firefly III shortcuts and a filtered calendar feed
#[derive(Parser, Debug)]
#[command(name = "reasonable-excuse")]
#[command(
    about = "Personal HTTP gateway for uploads, Firefly III shortcuts and calendar filtering"
)]
#[command(long_about = "
reasonable-excuse serves up to three independently configured route groups
behind one listener: a file upload endpoint, a Firefly III shortcut proxy and
a filtered iCal feed. Everything is configured in a KDL file.

EXAMPLES:
    # Start the server with ./config.kdl
    reasonable-excuse

    # Use the container configuration and listen on all interfaces
    reasonable-excuse --config /app/config.kdl serve --address 0.0.0.0:8080

    # Check configuration, token file and directories without starting
    reasonable-excuse serve --dry-run
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// KDL configuration file to load. Defaults to the file named by
    /// REASONABLE_EXCUSE_CONFIG_FILE, then ./config.kdl.
    /// The file must exist and be readable.
    ///
    /// Example: --config /app/config.kdl
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_parser = super::validation::validate_config_file_path
    )]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    ///
    /// Sets the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Sets the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   reasonable-excuse serve                          # Start with defaults
    ///   reasonable-excuse serve --address 0.0.0.0:8080  # Listen on all interfaces
    ///   reasonable-excuse serve --dry-run                # Validate config without starting
    Serve {
        /// Socket address to bind to
        ///
        /// Overrides `address` from the configuration file.
        /// Must be `ip:port`, e.g. 0.0.0.0:8080 or [::1]:3000.
        #[arg(
            long,
            value_name = "ADDRESS",
            value_parser = super::validation::validate_socket_address
        )]
        address: Option<String>,

        /// Log level override
        ///
        /// Overrides both the configuration file and the global --verbose/--quiet flags.
        ///
        /// Available levels: error, warn, info, debug, trace
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Loads the configuration, checks the upload directory, reads the
        /// Firefly token and compiles the calendar filter, then prints a
        /// summary. Returns exit code 0 if everything is ready.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Whether only the configuration should be checked
    pub fn is_dry_run(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { dry_run: true, .. }))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}
