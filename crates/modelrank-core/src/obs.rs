//! Structured observability hooks for report generation.
//!
//! This module provides:
//! - Report-scoped tracing spans via the `ReportSpan` RAII guard
//! - Emission functions for pipeline events: start, normalization, per-domain
//!   scoring, finish
//!
//! Events are emitted at `info!` level unless noted; rejected rows and failed
//! domains are `warn!`.

use tracing::{info, warn};

use crate::domain::BenchmarkKey;

/// RAII guard that enters a report-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = ReportSpan::enter("6f1c…");
/// // every event below carries run_id = "6f1c…"
/// ```
pub struct ReportSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReportSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("modelrank.report", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: report generation started for a source.
pub fn emit_report_started(run_id: &str, source: &str) {
    info!(event = "report.started", run_id = %run_id, source = %source);
}

/// Emit event: a batch finished normalizing.
pub fn emit_batch_normalized(total: usize, normalized: usize, rejected: usize) {
    info!(
        event = "batch.normalized",
        total = total,
        normalized = normalized,
        rejected = rejected,
    );
}

/// Emit event: a single row was rejected (warning level).
pub fn emit_record_rejected(position: usize, total: usize, error: &dyn std::fmt::Display) {
    warn!(event = "record.rejected", position = position, total = total, error = %error);
}

/// Emit event: two rows produced the same id (warning level).
pub fn emit_duplicate_id(id: &str) {
    warn!(event = "record.duplicate_id", id = %id);
}

/// Emit event: a configured metric is absent from the whole batch (warning level).
pub fn emit_metric_skipped(domain: &str, metric: BenchmarkKey) {
    warn!(event = "domain.metric_skipped", domain = %domain, metric = metric.as_str());
}

/// Emit event: a domain leaderboard was produced.
pub fn emit_domain_scored(domain: &str, entries: usize, used_metrics: &[BenchmarkKey]) {
    let used: Vec<&str> = used_metrics.iter().map(BenchmarkKey::as_str).collect();
    info!(
        event = "domain.scored",
        domain = %domain,
        entries = entries,
        used_metrics = %used.join(","),
    );
}

/// Emit event: a domain could not be scored (warning level).
pub fn emit_domain_failed(domain: &str, error: &dyn std::fmt::Display) {
    warn!(event = "domain.failed", domain = %domain, error = %error);
}

/// Emit event: report generation finished.
pub fn emit_report_finished(
    run_id: &str,
    duration_ms: u64,
    domains_scored: usize,
    domains_failed: usize,
) {
    info!(
        event = "report.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        domains_scored = domains_scored,
        domains_failed = domains_failed,
    );
}
