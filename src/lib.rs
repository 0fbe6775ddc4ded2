//! reasonable-excuse library
//!
//! Core modules of the reasonable-excuse HTTP gateway: configuration,
//! logging, upstream clients, services and the axum API.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
