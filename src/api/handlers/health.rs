//! Health check endpoint handlers.

use axum::{Router, extract::State, response::Json, routing::get};

use crate::api::dto::{HealthResponse, HealthStatus, MountedRoutes};
use crate::state::AppState;

/// Path of the health endpoint; always mounted.
pub const HEALTH_ROUTE: &str = "/health";

/// Creates the health check route.
pub fn health_routes() -> Router<AppState> {
    Router::new().route(HEALTH_ROUTE, get(health_check))
}

/// Reports the version and which route groups are mounted.
///
/// # Example Response
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T12:00:00Z",
///   "routes": { "upload": true, "firefly": false, "calendar": true }
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        routes: MountedRoutes {
            upload: state.services.upload.is_some(),
            firefly: state.services.firefly.is_some(),
            calendar: state.services.calendar.is_some(),
        },
    })
}
