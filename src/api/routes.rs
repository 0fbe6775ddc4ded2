//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, http::HeaderValue, middleware};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS (when `allow_origin` is set) - answers preflight requests
/// 2. Request ID middleware - generates/propagates request IDs
/// 3. Logging middleware - logs requests with request IDs
///
/// # Routes
/// - `/health` - always mounted
/// - upload, Firefly and calendar routes - mounted when configured
pub fn create_router(state: AppState) -> AppResult<Router> {
    let settings = state.settings.clone();
    let services = state.services.clone();

    let mut router = handlers::health::health_routes().with_state(state);

    if let (Some(config), Some(service)) = (&settings.upload, services.upload) {
        router = router.merge(handlers::upload::upload_routes(&config.route, service));
    }
    if let (Some(config), Some(service)) = (&settings.firefly_shortcuts, services.firefly) {
        router = router.merge(handlers::firefly::firefly_routes(config, service));
    }
    if let (Some(config), Some(service)) = (&settings.calendar, services.calendar) {
        router = router.merge(handlers::calendar::calendar_routes(&config.route, service));
    }

    // Middleware is applied in reverse order - last added runs first
    // So logging runs after request_id has set the ID
    let router = router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware));

    Ok(match settings.allow_origin.as_deref() {
        Some(origin) => router.layer(cors_layer(origin)?),
        None => router,
    })
}

/// CORS policy allowing `origin`, or any origin for `*`.
pub fn cors_layer(origin: &str) -> AppResult<CorsLayer> {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(origin).map_err(|e| AppError::Configuration {
            key: "allow_origin".to_string(),
            source: e.into(),
        })?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
