use serde::{Deserialize, Serialize};

/// One page of `GET /api/v1/budgets`.
#[derive(Debug, Deserialize)]
pub(super) struct BudgetPage {
    pub data: Vec<Budget>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PageMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Pagination {
    pub total_pages: u64,
}

impl BudgetPage {
    pub fn total_pages(&self) -> u64 {
        self.meta
            .as_ref()
            .and_then(|m| m.pagination.as_ref())
            .map(|p| p.total_pages)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Budget {
    pub id: String,
    pub attributes: BudgetAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BudgetAttributes {
    pub name: String,
}

/// Body of `POST /api/v1/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreTransactionRequest {
    pub error_if_duplicate_hash: bool,
    pub apply_rules: bool,
    pub fire_webhooks: bool,
    pub transactions: Vec<TransactionSplit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSplit {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub date: String,
    pub amount: String,
    pub description: String,
    pub budget_id: Option<String>,
    pub category_name: Option<String>,
    pub source_name: String,
    pub destination_name: String,
}
