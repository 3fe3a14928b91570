//! Offline row dumps.

use async_trait::async_trait;
use modelrank_core::{FetchError, RawRecord, RecordSource};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::parse_rows_page;

/// Decode a dump: either a JSON array of rows or a saved datasets-server
/// `rows` response.
pub fn parse_rows_document(content: &str) -> Result<Vec<RawRecord>, FetchError> {
    let document: Value = serde_json::from_str(content)?;
    match document {
        Value::Array(rows) => Ok(rows.into_iter().map(RawRecord::new).collect()),
        Value::Object(ref fields) if fields.contains_key("rows") => {
            Ok(parse_rows_page(content)?.rows)
        }
        other => Err(FetchError::Decode(format!(
            "expected an array of rows or a rows page, found {}",
            match other {
                Value::Object(_) => "an object without rows",
                Value::Null => "null",
                _ => "a scalar",
            }
        ))),
    }
}

/// Reads rows from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_raw_records(&self) -> Result<Vec<RawRecord>, FetchError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let rows = parse_rows_document(&content)?;
        info!(path = %self.path.display(), rows = rows.len(), "rows loaded from file");
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
