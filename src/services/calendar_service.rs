//! Filtered iCal proxy service.

use regex::Regex;
use reqwest::Url;

use crate::config::CalendarSettings;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "calendar";

/// Fetches the upstream feed and removes every match of the filter.
#[derive(Clone, Debug)]
pub struct CalendarService {
    http: reqwest::Client,
    base_url: Url,
    pass_param: String,
    filter: Regex,
}

impl CalendarService {
    pub fn new(settings: &CalendarSettings, http: reqwest::Client) -> AppResult<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| AppError::Configuration {
            key: "calendar.base_url".to_string(),
            source: e.into(),
        })?;
        let filter = Regex::new(&settings.filter).map_err(|e| AppError::Configuration {
            key: "calendar.filter".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            http,
            base_url,
            pass_param: settings.pass_param.clone(),
            filter,
        })
    }

    /// Name of the query parameter forwarded upstream.
    pub fn pass_param(&self) -> &str {
        &self.pass_param
    }

    /// Upstream URL with `<pass_param>=<value>` appended to its query.
    pub fn upstream_url(&self, value: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair(&self.pass_param, value);
        url
    }

    /// Removes every match of the filter from `body`.
    pub fn filter_body(&self, body: &str) -> String {
        self.filter.replace_all(body, "").into_owned()
    }

    /// Fetches the feed for `value` and returns it filtered.
    pub async fn fetch(&self, value: &str) -> AppResult<String> {
        let url = self.upstream_url(value);

        let body = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| {
                AppError::external(SERVICE, format!("request failed: {}", e), Some(e.into()))
            })?
            .error_for_status()
            .map_err(|e| AppError::external(SERVICE, format!("HTTP error: {}", e), Some(e.into())))?
            .text()
            .await
            .map_err(|e| {
                AppError::external(SERVICE, format!("unreadable body: {}", e), Some(e.into()))
            })?;

        let filtered = self.filter_body(&body);
        tracing::debug!(
            upstream_bytes = body.len(),
            filtered_bytes = filtered.len(),
            "Filtered calendar"
        );
        Ok(filtered)
    }
}
