//! HTTP request handlers for API endpoints.
//!
//! One module per route group, plus the health check.

pub mod calendar;
pub mod firefly;
pub mod health;
pub mod upload;
