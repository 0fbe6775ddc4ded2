//! Firefly III REST API client.

mod client;
mod types;

pub use client::FireflyClient;
pub use types::{Budget, BudgetAttributes, StoreTransactionRequest, TransactionSplit};
