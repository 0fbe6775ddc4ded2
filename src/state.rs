//! Application state for Axum web framework.
//!
//! Contains the loaded settings and the services built from them.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::services::Services;

/// Application state shared by all request handlers.
///
/// Cloning is cheap: settings sit behind an `Arc` and services share
/// their internals.
#[derive(Clone)]
pub struct AppState {
    /// Services of the configured route groups
    pub services: Services,
    /// Settings the services were built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Builds every configured service from `settings`.
    ///
    /// # Example
    /// ```ignore
    /// let settings = ConfigLoader::new().load()?;
    /// let state = AppState::new(settings)?;
    /// ```
    pub fn new(settings: Settings) -> AppResult<Self> {
        let services = Services::from_settings(&settings)?;
        Ok(Self::with_services(settings, services))
    }

    /// Pairs already-built services with their settings.
    pub fn with_services(settings: Settings, services: Services) -> Self {
        Self {
            services,
            settings: Arc::new(settings),
        }
    }
}
