//! Domain-weighted composite scores and ranking.
//!
//! # Averaging rule
//!
//! A metric is *used* for a run when at least one record in the batch
//! reported it. Each record's `domain_average` is the weighted mean over the
//! used metrics that this record reported, divided by the weights of those
//! same metrics. Records that reported none of them are dropped.
//!
//! # Tie-break
//!
//! Entries are sorted descending by `domain_average` with a stable sort, so
//! equal averages keep their input order. `rank` is `1 + position`.

use serde::{Deserialize, Serialize};

use crate::config::{DomainConfig, MetricWeight, ReportConfig};
use crate::domain::{BenchmarkKey, ModelRecord, ScoringError};
use crate::metrics::METRICS;
use crate::obs;

/// One ranked row of a domain leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainLeaderboardEntry {
    /// Id of the scored [`ModelRecord`].
    pub model_id: String,
    /// Position of the record in the scored slice.
    pub record_index: usize,
    pub domain_average: f64,
    /// Metrics that contributed to this entry, in weight-table order.
    pub used_metrics: Vec<BenchmarkKey>,
    /// 1-based.
    pub rank: usize,
}

/// A ranked domain leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainLeaderboard {
    pub domain: String,
    /// Configured metrics present somewhere in the batch, in table order.
    pub used_metrics: Vec<BenchmarkKey>,
    /// Configured metrics absent from the whole batch.
    pub skipped_metrics: Vec<BenchmarkKey>,
    /// Records without any used metric.
    pub dropped: usize,
    pub entries: Vec<DomainLeaderboardEntry>,
}

impl DomainLeaderboard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pair each entry with its record. `records` must be the slice that was scored.
    pub fn resolve<'r>(
        &'r self,
        records: &'r [ModelRecord],
    ) -> impl Iterator<Item = (&'r DomainLeaderboardEntry, &'r ModelRecord)> + 'r {
        self.entries.iter().filter_map(move |entry| {
            records
                .get(entry.record_index)
                .filter(|record| record.id == entry.model_id)
                .map(|record| (entry, record))
        })
    }
}

/// Scores records against the configured domains.
#[derive(Debug, Clone, Copy)]
pub struct DomainScorer<'a> {
    domains: &'a [DomainConfig],
}

impl<'a> DomainScorer<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            domains: &config.domains,
        }
    }

    pub fn from_domains(domains: &'a [DomainConfig]) -> Self {
        Self { domains }
    }

    /// Score and rank `records` for one domain.
    ///
    /// Fails with [`ScoringError::UnknownDomain`] for an unconfigured domain and
    /// with [`ScoringError::NoUsableMetrics`] when a non-empty batch reports
    /// none of the domain's metrics. An empty batch yields an empty board.
    pub fn score(
        &self,
        records: &[ModelRecord],
        domain: &str,
    ) -> Result<DomainLeaderboard, ScoringError> {
        let config = self
            .domains
            .iter()
            .find(|d| d.key == domain)
            .filter(|d| !d.weights.is_empty())
            .ok_or_else(|| ScoringError::UnknownDomain {
                domain: domain.to_string(),
            })?;

        if records.is_empty() {
            return Ok(DomainLeaderboard {
                domain: config.key.clone(),
                used_metrics: Vec::new(),
                skipped_metrics: config.metrics(),
                dropped: 0,
                entries: Vec::new(),
            });
        }

        let (used, skipped): (Vec<&MetricWeight>, Vec<&MetricWeight>) =
            config.weights.iter().partition(|w| {
                records
                    .iter()
                    .any(|record| record.metric_value(w.metric).is_some())
            });

        if used.is_empty() {
            return Err(ScoringError::NoUsableMetrics {
                domain: config.key.clone(),
                configured: config.metrics(),
            });
        }
        for w in &skipped {
            obs::emit_metric_skipped(&config.key, w.metric);
        }

        let mut entries = Vec::with_capacity(records.len());
        let mut dropped = 0;
        for (record_index, record) in records.iter().enumerate() {
            let mut weighted_sum = 0.0;
            let mut weight_total = 0.0;
            let mut contributing = Vec::new();
            for w in &used {
                if let Some(value) = record.metric_value(w.metric) {
                    weighted_sum += w.weight * value;
                    weight_total += w.weight;
                    contributing.push(w.metric);
                }
            }
            if weight_total > 0.0 {
                entries.push(DomainLeaderboardEntry {
                    model_id: record.id.clone(),
                    record_index,
                    domain_average: weighted_sum / weight_total,
                    used_metrics: contributing,
                    rank: 0,
                });
            } else {
                dropped += 1;
            }
        }

        // Stable: equal averages keep input order.
        entries.sort_by(|a, b| b.domain_average.total_cmp(&a.domain_average));
        for (position, entry) in entries.iter_mut().enumerate() {
            entry.rank = position + 1;
        }

        Ok(DomainLeaderboard {
            domain: config.key.clone(),
            used_metrics: used.iter().map(|w| w.metric).collect(),
            skipped_metrics: skipped.iter().map(|w| w.metric).collect(),
            dropped,
            entries,
        })
    }
}

/// Score `records` for `domain` using the tables in `config`.
pub fn score_domain(
    records: &[ModelRecord],
    domain: &str,
    config: &ReportConfig,
) -> Result<DomainLeaderboard, ScoringError> {
    let result = DomainScorer::new(config).score(records, domain);
    match &result {
        Ok(board) => {
            METRICS.inc_domains_scored();
            obs::emit_domain_scored(domain, board.entries.len(), &board.used_metrics);
        }
        Err(err) => {
            METRICS.inc_domains_failed();
            obs::emit_domain_failed(domain, err);
        }
    }
    result
}
