//! Firefly shortcut service.
//!
//! Holds the configured shortcuts and turns a shortcut submission into a
//! Firefly III withdrawal.

use std::sync::Arc;

use crate::api::dto::{AddTransactionRequest, ShortcutResponse};
use crate::config::{FireflySettings, ShortcutSettings};
use crate::error::{AppError, AppResult};
use crate::external::FireflyClient;
use crate::external::firefly::{StoreTransactionRequest, TransactionSplit};

/// Timestamp layout Firefly expects, e.g. `2018-09-17T12:46:47+01:00`.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Shortcut listing and submission backed by a [`FireflyClient`].
#[derive(Clone)]
pub struct FireflyService {
    client: FireflyClient,
    shortcuts: Arc<[ShortcutSettings]>,
}

impl FireflyService {
    pub fn new(client: FireflyClient, shortcuts: Vec<ShortcutSettings>) -> Self {
        Self {
            client,
            shortcuts: shortcuts.into(),
        }
    }

    /// Reads the personal access token and builds the service.
    pub fn from_settings(settings: &FireflySettings, http: reqwest::Client) -> AppResult<Self> {
        let token = read_token(settings)?;
        let client = FireflyClient::new(http, &settings.firefly_url, token)?;
        Ok(Self::new(client, settings.shortcuts.clone()))
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcuts.len()
    }

    /// Shortcuts with their ids, in configuration order.
    pub fn list_shortcuts(&self) -> Vec<ShortcutResponse> {
        self.shortcuts
            .iter()
            .enumerate()
            .map(|(id, shortcut)| ShortcutResponse::from_settings(id as u64, shortcut))
            .collect()
    }

    /// Submits the shortcut named by `request` and returns Firefly's response body.
    pub async fn add_transaction(&self, request: &AddTransactionRequest) -> AppResult<String> {
        let shortcut = usize::try_from(request.shortcut_id)
            .ok()
            .and_then(|id| self.shortcuts.get(id))
            .ok_or_else(|| AppError::Validation {
                field: "shortcut_id".to_string(),
                reason: format!("no shortcut with id {}", request.shortcut_id),
            })?;

        let amount = resolve_amount(shortcut, request.amount_override)?;

        let budget_id = match &shortcut.budget {
            Some(budget) => Some(self.client.find_budget_id(budget).await?),
            None => None,
        };

        let date = jiff::Zoned::now().strftime(DATE_FORMAT).to_string();
        let store_request = build_store_request(shortcut, amount, budget_id, date);

        tracing::info!(
            shortcut = %shortcut.label,
            amount,
            "Submitting Firefly transaction"
        );
        self.client.store_transaction(&store_request).await
    }
}

fn read_token(settings: &FireflySettings) -> AppResult<String> {
    let configuration_error = |source: anyhow::Error| AppError::Configuration {
        key: "firefly_shortcuts.pat_file".to_string(),
        source,
    };

    let token = std::fs::read_to_string(&settings.pat_file).map_err(|e| {
        configuration_error(anyhow::Error::new(e).context(format!(
            "read Firefly PAT from {}",
            settings.pat_file.display()
        )))
    })?;

    let token = token.trim_end();
    if token.is_empty() {
        return Err(configuration_error(anyhow::anyhow!(
            "Firefly PAT file {} is empty",
            settings.pat_file.display()
        )));
    }

    Ok(token.to_string())
}

/// The override wins over the shortcut's own amount; one of them is required.
pub fn resolve_amount(shortcut: &ShortcutSettings, amount_override: Option<f64>) -> AppResult<f64> {
    amount_override
        .or(shortcut.amount)
        .ok_or_else(|| AppError::Validation {
            field: "amount_override".to_string(),
            reason: format!("shortcut '{}' has no amount, an override is required", shortcut.label),
        })
}

/// Builds the single-split withdrawal for `shortcut`.
pub fn build_store_request(
    shortcut: &ShortcutSettings,
    amount: f64,
    budget_id: Option<String>,
    date: String,
) -> StoreTransactionRequest {
    StoreTransactionRequest {
        error_if_duplicate_hash: true,
        apply_rules: true,
        fire_webhooks: true,
        transactions: vec![TransactionSplit {
            transaction_type: "withdrawal".to_string(),
            date,
            amount: amount.to_string(),
            description: shortcut.name.clone(),
            budget_id,
            category_name: shortcut.category.clone(),
            source_name: shortcut.source.clone(),
            destination_name: shortcut.destination.clone(),
        }],
    }
}
