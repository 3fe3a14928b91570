//! Domain-level error taxonomy for ModelRank.
//!
//! Severity follows the pipeline stage that raises the error:
//! - [`NormalizationError`] is per record; batches skip and count it.
//! - [`ScoringError`] is fatal for one domain only; sibling domains still run.
//! - [`FetchError`] is fatal for the whole run.

use crate::domain::record::BenchmarkKey;

/// Why a single raw record could not be normalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationCause {
    #[error("raw record is not a mapping (found {found})")]
    NotAMapping { found: &'static str },
}

/// A raw record that could not be turned into a [`ModelRecord`](crate::ModelRecord).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to normalize record {identifier}: {cause}")]
pub struct NormalizationError {
    /// `fullname` of the offending record, or `"Unknown"`.
    pub identifier: String,
    pub cause: NormalizationCause,
}

/// Batch-fatal errors for a single domain leaderboard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("unknown domain: {domain}")]
    UnknownDomain { domain: String },

    #[error("no usable metrics for domain {domain}: none of {configured:?} present in batch")]
    NoUsableMetrics {
        domain: String,
        configured: Vec<BenchmarkKey>,
    },
}

/// Errors reported by a raw-record source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("could not decode dataset rows: {0}")]
    Decode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// ModelRank umbrella error.
#[derive(Debug, thiserror::Error)]
pub enum ModelRankError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ModelRank domain operations.
pub type Result<T> = std::result::Result<T, ModelRankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_error_names_record() {
        let err = NormalizationError {
            identifier: "org/model".to_string(),
            cause: NormalizationCause::NotAMapping { found: "string" },
        };
        let msg = err.to_string();
        assert!(msg.contains("org/model"));
        assert!(msg.contains("found string"));
    }

    #[test]
    fn test_not_a_mapping_display() {
        let err = NormalizationError {
            identifier: "Unknown".to_string(),
            cause: NormalizationCause::NotAMapping { found: "array" },
        };
        assert!(err.to_string().contains("not a mapping"));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_scoring_error_display() {
        let err = ScoringError::UnknownDomain {
            domain: "chemistry".to_string(),
        };
        assert_eq!(err.to_string(), "unknown domain: chemistry");

        let err = ScoringError::NoUsableMetrics {
            domain: "legal".to_string(),
            configured: vec![BenchmarkKey::MmluPro, BenchmarkKey::Bbh],
        };
        let msg = err.to_string();
        assert!(msg.contains("legal"));
        assert!(msg.contains("MmluPro"));
    }

    #[test]
    fn test_fetch_error_wraps_into_umbrella() {
        let err: ModelRankError = FetchError::Status {
            status: 503,
            url: "https://example.invalid/rows".to_string(),
        }
        .into();
        assert!(err.to_string().contains("fetch failed"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_config_error() {
        let err = ModelRankError::Config("duplicate domain key: legal".to_string());
        assert!(err.to_string().contains("invalid configuration"));
        assert!(err.to_string().contains("legal"));
    }
}
