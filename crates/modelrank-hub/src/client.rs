//! Hugging Face datasets-server client
//!
//! Fetches every row of the leaderboard dataset through the paginated
//! `GET /rows` endpoint. A failed page fails the whole fetch; no retries.

use async_trait::async_trait;
use modelrank_core::{FetchError, RawRecord, RecordSource};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::HubConfig;

/// One entry of the `rows` array.
#[derive(Debug, Clone, Deserialize)]
struct RowEntry {
    row: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    rows: Vec<RowEntry>,
    num_rows_total: Option<usize>,
}

/// A decoded page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsPage {
    pub rows: Vec<RawRecord>,
    /// Total row count reported by the server, if any.
    pub num_rows_total: Option<usize>,
}

/// Decode a datasets-server `rows` response body.
pub fn parse_rows_page(body: &str) -> Result<RowsPage, FetchError> {
    let response: RowsResponse = serde_json::from_str(body)?;
    Ok(RowsPage {
        rows: response
            .rows
            .into_iter()
            .map(|entry| RawRecord::new(entry.row))
            .collect(),
        num_rows_total: response.num_rows_total,
    })
}

/// Whether a paginated fetch is complete after a page of `received` rows.
///
/// Stops on an empty page, once `fetched` reaches the server's total, or, when
/// no total was reported, on a page shorter than `page_size`.
pub fn fetch_complete(
    fetched: usize,
    received: usize,
    total: Option<usize>,
    page_size: usize,
) -> bool {
    if received == 0 {
        return true;
    }
    match total {
        Some(total) => fetched >= total,
        None => received < page_size,
    }
}

/// Datasets-server client
pub struct HubClient {
    config: HubConfig,
    http_client: reqwest::Client,
}

impl HubClient {
    /// Create a new client
    pub fn new(config: HubConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("modelrank/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(HubClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(HubConfig::from_env())
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// URL of the `rows` endpoint.
    pub fn rows_url(&self) -> String {
        format!("{}/rows", self.config.endpoint.trim_end_matches('/'))
    }

    /// Fetch one page starting at `offset`.
    pub async fn fetch_page(&self, offset: usize) -> Result<RowsPage, FetchError> {
        let url = self.rows_url();
        let length = self.config.effective_page_size();
        debug!(offset = offset, length = length, "fetching rows page");

        let offset_param = offset.to_string();
        let length_param = length.to_string();
        let mut request = self.http_client.get(&url).query(&[
            ("dataset", self.config.dataset.as_str()),
            ("config", self.config.config.as_str()),
            ("split", self.config.split.as_str()),
            ("offset", offset_param.as_str()),
            ("length", length_param.as_str()),
        ]);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_rows_page(&body)
    }

    /// Fetch every row of the configured split.
    pub async fn fetch_all(&self) -> Result<Vec<RawRecord>, FetchError> {
        info!(
            dataset = %self.config.dataset,
            split = %self.config.split,
            "fetching leaderboard rows"
        );
        let page_size = self.config.effective_page_size();
        let mut rows = Vec::new();
        let mut total = None;

        loop {
            let page = self.fetch_page(rows.len()).await?;
            if total.is_none() {
                total = page.num_rows_total;
            }
            let received = page.rows.len();
            rows.extend(page.rows);

            if fetch_complete(rows.len(), received, total, page_size) {
                break;
            }
        }

        info!(rows = rows.len(), "leaderboard rows fetched");
        Ok(rows)
    }
}

#[async_trait]
impl RecordSource for HubClient {
    async fn fetch_raw_records(&self) -> Result<Vec<RawRecord>, FetchError> {
        self.fetch_all().await
    }

    fn describe(&self) -> String {
        format!(
            "hub {} ({}/{})",
            self.config.dataset, self.config.config, self.config.split
        )
    }
}
