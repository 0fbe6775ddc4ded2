//! Clients for upstream HTTP services.

pub mod client;
pub mod firefly;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{USER_AGENT, build_http_client};
pub use firefly::FireflyClient;
