//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `error` - Common error response DTOs
//! - `firefly` - Shortcut listing and transaction request DTOs
//! - `health` - Health check response

mod error;
mod firefly;
mod health;

pub use error::ErrorResponse;
pub use firefly::{AddTransactionRequest, ShortcutResponse};
pub use health::{HealthResponse, HealthStatus, MountedRoutes};
