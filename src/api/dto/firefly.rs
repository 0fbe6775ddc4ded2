//! Firefly shortcut request/response DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::ShortcutSettings;

/// A configured shortcut as listed by `GET {route}/shortcuts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutResponse {
    pub shortcut_id: u64,
    pub shortcut_name: String,
    pub shortcut_icon: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub amount: Option<f64>,
    pub budget: Option<String>,
    pub category: Option<String>,
}

impl ShortcutResponse {
    /// Builds the listing entry for the shortcut at `shortcut_id`.
    pub fn from_settings(shortcut_id: u64, shortcut: &ShortcutSettings) -> Self {
        Self {
            shortcut_id,
            shortcut_name: shortcut.label.clone(),
            shortcut_icon: shortcut.icon.clone(),
            name: shortcut.name.clone(),
            source: shortcut.source.clone(),
            destination: shortcut.destination.clone(),
            amount: shortcut.amount,
            budget: shortcut.budget.clone(),
            category: shortcut.category.clone(),
        }
    }
}

/// Body of `POST {route}/add-transaction`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddTransactionRequest {
    pub shortcut_id: u64,

    // JSON numbers are always finite
    #[validate(range(exclusive_min = 0.0, message = "must be a positive number"))]
    pub amount_override: Option<f64>,
}
