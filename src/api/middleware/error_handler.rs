//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError,
//! providing consistent error response formatting across the API.
//! Server-side failures are logged here with their source chain and
//! reported to the client without internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - BadRequest, Validation, ValidationErrors → 400 BAD_REQUEST
    /// - Conflict → 409 CONFLICT
    /// - ExternalApi → 502 BAD_GATEWAY
    /// - Configuration, Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, code, "Request failed");
        } else {
            tracing::warn!(error = %self, code, "Request rejected");
        }

        let error_response = match &self {
            AppError::BadRequest { message } | AppError::Conflict { message } => {
                ErrorResponse::new(code, message)
            }
            AppError::Validation { field, reason } => {
                ErrorResponse::new(code, &format!("Validation failed for {}: {}", field, reason))
                    .with_details(json!({ "field": field, "reason": reason }))
            }
            AppError::ValidationErrors { errors } => {
                let details: Vec<_> = errors
                    .iter()
                    .map(|e| json!({ "field": e.field, "message": e.message }))
                    .collect();
                ErrorResponse::new(code, "Request validation failed")
                    .with_details(json!({ "errors": details }))
            }
            AppError::ExternalApi { service, message, .. } => ErrorResponse::new(
                code,
                &format!("Upstream {} request failed: {}", service, message),
            )
            .with_details(json!({ "service": service })),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(code, &format!("Configuration error: {}", key))
                    .with_details(json!({ "key": key }))
            }
            AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::ExternalApi { .. } => StatusCode::BAD_GATEWAY,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::Conflict { .. } => "CONFLICT",
        AppError::ExternalApi { .. } => "BAD_GATEWAY",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}
