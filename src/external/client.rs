use std::time::Duration;

use crate::config::ClientSettings;
use crate::error::{AppError, AppResult};

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!("reasonable-excuse/", env!("CARGO_PKG_VERSION"));

/// Builds the shared outbound HTTP client.
///
/// One client is built at startup and cloned into every service, so all
/// upstream calls share its connection pool.
///
/// # Features
/// - **Compression**: gzip, deflate, brotli and zstd responses
/// - **HTTP/2**: adaptive window sizing and keep-alive
/// - **Timeouts**: from the `client` configuration block
pub fn build_http_client(settings: &ClientSettings) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout))
        .connect_timeout(Duration::from_secs(settings.connect_timeout))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::Configuration {
            key: "client".to_string(),
            source: e.into(),
        })
}
