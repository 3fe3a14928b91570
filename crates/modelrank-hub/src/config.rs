//! Hub client configuration.
//!
//! Values are passed explicitly. [`HubConfig::from_env`] exists for the
//! binary; library code never reads the environment.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://datasets-server.huggingface.co";
pub const DEFAULT_DATASET: &str = "open-llm-leaderboard/contents";

/// Largest page the datasets server returns.
pub const MAX_PAGE_SIZE: usize = 100;

/// Datasets-server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Datasets-server base URL
    pub endpoint: String,
    /// Dataset repository, `org/name`
    pub dataset: String,
    /// Dataset config name
    pub config: String,
    pub split: String,
    /// Bearer token (optional for public datasets)
    pub token: Option<String>,
    /// Rows per request, capped at [`MAX_PAGE_SIZE`]
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            config: "default".to_string(),
            split: "train".to_string(),
            token: None,
            page_size: MAX_PAGE_SIZE,
            timeout_secs: 30,
        }
    }
}

impl HubConfig {
    /// Defaults overridden by `MODELRANK_HUB_ENDPOINT`, `MODELRANK_DATASET`
    /// and `HF_TOKEN`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("MODELRANK_HUB_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(dataset) = std::env::var("MODELRANK_DATASET") {
            config.dataset = dataset;
        }
        config.token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());
        config
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_dataset(mut self, dataset: &str) -> Self {
        self.dataset = dataset.to_string();
        self
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Effective page size, clamped to the server limit.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_dataset() {
        let config = HubConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.dataset, "open-llm-leaderboard/contents");
        assert_eq!(config.split, "train");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_builders() {
        let config = HubConfig::default()
            .with_endpoint("http://localhost:8080/")
            .with_dataset("org/rows")
            .with_token("hf_x")
            .with_page_size(500)
            .with_timeout_secs(5);
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.dataset, "org/rows");
        assert_eq!(config.token.as_deref(), Some("hf_x"));
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_effective_page_size_clamps_zero() {
        let config = HubConfig {
            page_size: 0,
            ..HubConfig::default()
        };
        assert_eq!(config.effective_page_size(), 1);
    }
}
