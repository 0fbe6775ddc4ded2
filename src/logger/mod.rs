//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output with multiple formats (Full, Compact, JSON)
//! - `RUST_LOG` taking precedence over the configured level

pub mod config;
pub mod error;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

// Re-export main types
pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::open_log_writer;

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.env_filter()?,
    };

    if !config.file.enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer(&config.console))
            .init();
        return Ok(());
    }

    let writer = open_log_writer(&config.file)?;

    // File layer must be added BEFORE the console layer, otherwise ANSI codes
    // leak into span fields written to the file.
    // See: https://github.com/tokio-rs/tracing/issues/1817
    match config.file.format {
        LogFormat::Full => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer(&config.console))
                .init();
        }
        LogFormat::Compact => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .compact()
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer(&config.console))
                .init();
        }
        LogFormat::Json => {
            let file_layer = fmt::layer().with_ansi(false).json().with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer(&config.console))
                .init();
        }
    }

    Ok(())
}

fn console_layer<S>(config: &ConsoleConfig) -> Option<fmt::Layer<S>> {
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    config.enabled.then(|| {
        fmt::layer()
            .with_ansi(use_ansi)
            .with_target(true)
            .with_level(true)
    })
}
