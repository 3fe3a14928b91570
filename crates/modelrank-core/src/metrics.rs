//! Global atomic counters for report observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a report run).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters, no allocations, no locking.
pub struct Metrics {
    records_normalized: AtomicU64,
    records_rejected: AtomicU64,
    domains_scored: AtomicU64,
    domains_failed: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            records_normalized: AtomicU64::new(0),
            records_rejected: AtomicU64::new(0),
            domains_scored: AtomicU64::new(0),
            domains_failed: AtomicU64::new(0),
        }
    }

    pub fn inc_records_normalized(&self) {
        self.records_normalized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_records_rejected(&self) {
        self.records_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "records_rejected", "counter incremented");
    }

    pub fn inc_domains_scored(&self) {
        self.domains_scored.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "domains_scored", "counter incremented");
    }

    pub fn inc_domains_failed(&self) {
        self.domains_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "domains_failed", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a report run) rather than on
    /// every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            records_normalized = self.records_normalized(),
            records_rejected = self.records_rejected(),
            domains_scored = self.domains_scored(),
            domains_failed = self.domains_failed(),
        );
    }

    pub fn records_normalized(&self) -> u64 {
        self.records_normalized.load(Ordering::Relaxed)
    }

    pub fn records_rejected(&self) -> u64 {
        self.records_rejected.load(Ordering::Relaxed)
    }

    pub fn domains_scored(&self) -> u64 {
        self.domains_scored.load(Ordering::Relaxed)
    }

    pub fn domains_failed(&self) -> u64 {
        self.domains_failed.load(Ordering::Relaxed)
    }
}
