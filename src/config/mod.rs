//! Configuration management module for reasonable-excuse
//!
//! Configuration is a single KDL document (`config.kdl` by default) with
//! `REASONABLE_EXCUSE_*` environment variables layered on top.
//!
//! # Configuration Priority (lowest to highest)
//! 1. Built-in defaults
//! 2. The KDL configuration file
//! 3. `REASONABLE_EXCUSE_*` environment variables

pub mod error;
pub mod kdl;
pub mod loader;
pub mod settings;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use error::ConfigError;
pub use kdl::KdlFormat;
pub use loader::ConfigLoader;
pub use settings::{
    CalendarSettings, ClientSettings, FireflySettings, LoggerSettings, Settings, ShortcutSettings,
    UploadSettings,
};
