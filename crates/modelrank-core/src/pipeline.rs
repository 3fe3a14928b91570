//! One report run: normalize, rank overall, score every configured domain.
//!
//! Per-record failures are counted, per-domain failures are recorded in the
//! domain's [`DomainOutcome`]. Neither stops the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Instant;
use uuid::Uuid;

use crate::config::ReportConfig;
use crate::domain::{BenchmarkKey, FetchError, RawRecord, ScoringError};
use crate::leaderboard::{overall_leaderboard, OverallEntry};
use crate::metrics::METRICS;
use crate::normalize::{normalize_batch, NormalizedBatch};
use crate::obs;
use crate::scoring::{score_domain, DomainLeaderboard};
use crate::source::RecordSource;

/// Result of scoring one domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainOutcome {
    Scored(DomainLeaderboard),
    Failed { domain: String, error: ScoringError },
}

impl DomainOutcome {
    pub fn domain(&self) -> &str {
        match self {
            DomainOutcome::Scored(board) => &board.domain,
            DomainOutcome::Failed { domain, .. } => domain,
        }
    }

    pub fn leaderboard(&self) -> Option<&DomainLeaderboard> {
        match self {
            DomainOutcome::Scored(board) => Some(board),
            DomainOutcome::Failed { .. } => None,
        }
    }
}

/// Everything produced by one report run.
#[derive(Debug, Clone)]
pub struct LeaderboardReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 over the raw rows, for provenance.
    pub snapshot_digest: String,
    pub batch: NormalizedBatch,
    pub overall: Vec<OverallEntry>,
    /// One outcome per configured domain, in configuration order.
    pub domains: Vec<DomainOutcome>,
}

/// Serializable per-domain status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainStatus {
    pub domain: String,
    pub scored: bool,
    pub entries: usize,
    pub used_metrics: Vec<BenchmarkKey>,
    pub error: Option<String>,
}

/// Serializable run summary written next to the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub snapshot_digest: String,
    pub total_rows: usize,
    pub normalized: usize,
    pub rejected: usize,
    pub duplicate_ids: Vec<String>,
    pub domains: Vec<DomainStatus>,
}

impl ReportSummary {
    pub fn failed_domains(&self) -> Vec<&str> {
        self.domains
            .iter()
            .filter(|d| !d.scored)
            .map(|d| d.domain.as_str())
            .collect()
    }
}

impl LeaderboardReport {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            run_id: self.run_id,
            generated_at: self.generated_at,
            snapshot_digest: self.snapshot_digest.clone(),
            total_rows: self.batch.total,
            normalized: self.batch.records.len(),
            rejected: self.batch.error_count,
            duplicate_ids: self.batch.duplicate_ids.clone(),
            domains: self
                .domains
                .iter()
                .map(|outcome| match outcome {
                    DomainOutcome::Scored(board) => DomainStatus {
                        domain: board.domain.clone(),
                        scored: true,
                        entries: board.entries.len(),
                        used_metrics: board.used_metrics.clone(),
                        error: None,
                    },
                    DomainOutcome::Failed { domain, error } => DomainStatus {
                        domain: domain.clone(),
                        scored: false,
                        entries: 0,
                        used_metrics: Vec::new(),
                        error: Some(error.to_string()),
                    },
                })
                .collect(),
        }
    }

    /// Outcome for one domain.
    pub fn domain(&self, key: &str) -> Option<&DomainOutcome> {
        self.domains.iter().find(|d| d.domain() == key)
    }
}

/// SHA-256 hex digest over the rows' canonical JSON, one row per line.
pub fn snapshot_digest(raw: &[RawRecord]) -> String {
    let mut hasher = Sha256::new();
    for row in raw {
        hasher.update(row.as_value().to_string().as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Run the whole pipeline over a fetched batch.
pub fn build_report(raw: &[RawRecord], config: &ReportConfig) -> LeaderboardReport {
    generate(raw, config, "in-memory batch")
}

/// Fetch from `source`, then run the pipeline. Only a fetch failure is an error.
pub async fn run_report(
    source: &dyn RecordSource,
    config: &ReportConfig,
) -> Result<LeaderboardReport, FetchError> {
    let raw = source.fetch_raw_records().await?;
    Ok(generate(&raw, config, &source.describe()))
}

fn generate(raw: &[RawRecord], config: &ReportConfig, source: &str) -> LeaderboardReport {
    let run_id = Uuid::new_v4();
    let run_id_str = run_id.to_string();
    let _span = obs::ReportSpan::enter(&run_id_str);
    let started = Instant::now();
    obs::emit_report_started(&run_id_str, source);

    let batch = normalize_batch(raw, &config.model_types);
    let overall = overall_leaderboard(&batch.records);

    let domains: Vec<DomainOutcome> = config
        .domains
        .iter()
        .map(|domain| match score_domain(&batch.records, &domain.key, config) {
            Ok(board) => DomainOutcome::Scored(board),
            Err(error) => DomainOutcome::Failed {
                domain: domain.key.clone(),
                error,
            },
        })
        .collect();

    let failed = domains
        .iter()
        .filter(|d| matches!(d, DomainOutcome::Failed { .. }))
        .count();
    obs::emit_report_finished(
        &run_id_str,
        started.elapsed().as_millis() as u64,
        domains.len() - failed,
        failed,
    );
    METRICS.flush();

    LeaderboardReport {
        run_id,
        generated_at: Utc::now(),
        snapshot_digest: snapshot_digest(raw),
        batch,
        overall,
        domains,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_digest_is_deterministic() {
        let rows = vec![RawRecord::new(json!({"fullname": "org/a", "BBH": 1.0}))];
        let a = snapshot_digest(&rows);
        let b = snapshot_digest(&rows.clone());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let other = vec![RawRecord::new(json!({"fullname": "org/a", "BBH": 2.0}))];
        assert_ne!(a, snapshot_digest(&other));
    }

    #[test]
    fn test_summary_reports_failed_domains() {
        let rows = vec![RawRecord::new(json!({"fullname": "org/a", "MATH Lvl 5": 9.0}))];
        let report = build_report(&rows, &ReportConfig::default());
        let summary = report.summary();
        // Only finance weights MATH.
        assert_eq!(summary.failed_domains(), vec!["medical", "legal"]);
        let finance = report.domain("finance").and_then(DomainOutcome::leaderboard);
        assert_eq!(finance.map(|b| b.entries.len()), Some(1));
    }

    #[tokio::test]
    async fn test_run_report_uses_source_rows() {
        let source = crate::source::MemorySource::new(vec![RawRecord::new(
            json!({"fullname": "org/a", "BBH": 40.0, "MMLU-PRO": 30.0}),
        )]);
        let report = run_report(&source, &ReportConfig::default())
            .await
            .expect("memory source never fails");
        assert_eq!(report.batch.records.len(), 1);
        assert!(report.summary().failed_domains().is_empty());
    }
}
