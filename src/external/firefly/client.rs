use reqwest::{Method, RequestBuilder, StatusCode, Url};

use super::types::{Budget, BudgetPage, StoreTransactionRequest};
use crate::error::{AppError, AppResult};

const SERVICE: &str = "firefly";
const BUDGETS_ENDPOINT: &str = "api/v1/budgets";
const TRANSACTIONS_ENDPOINT: &str = "api/v1/transactions";
const JSON_API: &str = "application/vnd.api+json";

/// Authenticated client for one Firefly III instance.
#[derive(Clone)]
pub struct FireflyClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl FireflyClient {
    /// Creates a client for the instance at `base_url`, authenticating with
    /// the personal access token `token`.
    pub fn new(http: reqwest::Client, base_url: &str, token: impl Into<String>) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| AppError::Configuration {
            key: "firefly_shortcuts.firefly_url".to_string(),
            source: e.into(),
        })?;

        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::external(SERVICE, message, source)
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Self::make_error(format!("invalid endpoint {}", path), Some(e.into())))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, JSON_API)
    }

    /// Lists every budget, following pagination.
    pub async fn list_budgets(&self) -> AppResult<Vec<Budget>> {
        let endpoint = self.endpoint(BUDGETS_ENDPOINT)?;
        let mut budgets = Vec::new();
        let mut page = 1u64;

        loop {
            let mut url = endpoint.clone();
            url.query_pairs_mut().append_pair("page", &page.to_string());

            let request = self.request(Method::GET, url);
            let body = Self::checked_body("list_budgets", request).await?;
            let body: BudgetPage = serde_json::from_str(&body).map_err(|e| {
                Self::make_error(format!("list_budgets invalid JSON: {}", e), Some(e.into()))
            })?;

            let total_pages = body.total_pages();
            budgets.extend(body.data);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = budgets.len(), pages = page, "Fetched Firefly budgets");
        Ok(budgets)
    }

    /// Resolves a budget name to its id.
    pub async fn find_budget_id(&self, name: &str) -> AppResult<String> {
        self.list_budgets()
            .await?
            .into_iter()
            .find(|b| b.attributes.name == name)
            .map(|b| b.id)
            .ok_or_else(|| Self::make_error(format!("no budget named '{}'", name), None))
    }

    /// Stores a transaction and returns the upstream response body.
    pub async fn store_transaction(&self, request: &StoreTransactionRequest) -> AppResult<String> {
        let url = self.endpoint(TRANSACTIONS_ENDPOINT)?;
        let request = self.request(Method::POST, url).json(request);
        Self::checked_body("store_transaction", request).await
    }

    /// Sends `request` and returns the body; a non-2xx body is logged, not returned.
    async fn checked_body(operation: &str, request: RequestBuilder) -> AppResult<String> {
        let response = request.send().await.map_err(|e| {
            Self::make_error(format!("{} request failed: {}", operation, e), Some(e.into()))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Self::make_error(
                format!("{} unreadable response: {}", operation, e),
                Some(e.into()),
            )
        })?;

        if !status.is_success() {
            tracing::error!(
                operation,
                status = status.as_u16(),
                body = %body,
                "Firefly request failed"
            );
            return Err(Self::make_error(
                format!("{}: {}", operation, describe_status(status)),
                None,
            ));
        }

        Ok(body)
    }
}

fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
