//! Raw-record sources.
//!
//! The pipeline only needs "a batch of rows, or a failure". Implement
//! [`RecordSource`] to plug in the hub client, a local dump, or a test stub.
//! Retries, if any, belong to the implementation.

use async_trait::async_trait;

use crate::domain::{FetchError, RawRecord};

/// Injectable source of raw leaderboard rows.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the complete batch of rows for one report run.
    async fn fetch_raw_records(&self) -> Result<Vec<RawRecord>, FetchError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// In-memory source returning a fixed batch.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawRecord>,
}

impl MemorySource {
    pub fn new(rows: Vec<RawRecord>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch_raw_records(&self) -> Result<Vec<RawRecord>, FetchError> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }
}
