//! Normalizer: raw dataset rows → canonical [`ModelRecord`]s.
//!
//! This is the only place that reads upstream column names. Missing or
//! malformed cells take their documented defaults and are logged; a record
//! fails only when it is not a mapping.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::ModelTypeTable;
use crate::domain::raw::value_kind;
use crate::domain::{
    columns, BenchmarkKey, BenchmarkScore, Features, Metadata, ModelRecord, NormalizationCause,
    NormalizationError, RawRecord,
};
use crate::metrics::METRICS;
use crate::obs;

/// Placeholder for missing id components and identifiers.
pub const UNKNOWN: &str = "Unknown";

/// Separator between id components.
pub const ID_SEPARATOR: char = '_';

/// Characters stripped from model types: decorative glyphs and spaces.
const TYPE_GLYPHS: &[char] = &['🔶', '🟢', '🟩', '💬', '🤝', '🌸', '⭕', '\u{fe0f}', ' '];

/// Lowercase, cut at the first `(` and drop decorative glyphs and spaces.
/// Idempotent.
pub fn clean_model_type(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let head = match lowered.find('(') {
        Some(idx) => &lowered[..idx],
        None => lowered.as_str(),
    };
    head.trim()
        .chars()
        .filter(|c| !TYPE_GLYPHS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Clean a model type and map it through the canonicalization table.
pub fn canonicalize_model_type(raw: &str, table: &ModelTypeTable) -> String {
    let cleaned = clean_model_type(raw);
    match table.lookup(&cleaned) {
        Some(canonical) => canonical.to_string(),
        None => cleaned,
    }
}

/// Build the composite evaluation id.
pub fn build_record_id(
    fullname: Option<&str>,
    precision: Option<&str>,
    sha: Option<&str>,
    chat_template: Option<bool>,
) -> String {
    let chat = match chat_template {
        Some(true) => "True",
        Some(false) => "False",
        None => UNKNOWN,
    };
    [
        fullname.unwrap_or(UNKNOWN),
        precision.unwrap_or(UNKNOWN),
        sha.unwrap_or(UNKNOWN),
        chat,
    ]
    .join(&ID_SEPARATOR.to_string())
}

/// Typed field access over one raw row. A cell that cannot be coerced is
/// logged and read as absent.
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    identifier: &'a str,
}

impl<'a> FieldReader<'a> {
    fn malformed<T>(&self, field: &str, expected: &'static str, value: &Value) -> Option<T> {
        warn!(
            model = %self.identifier,
            field = field,
            expected = expected,
            found = value_kind(value),
            "malformed cell, using default"
        );
        None
    }

    fn string(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => self.malformed(field, "string", other),
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        let value = self.fields.get(field)?;
        let parsed = match value {
            Value::Null => return None,
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => return None,
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed.filter(|v| v.is_finite()) {
            Some(v) => Some(v),
            None => self.malformed(field, "number", value),
        }
    }

    fn integer(&self, field: &str) -> Option<i64> {
        let v = self.number(field)?;
        if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Some(v as i64)
        } else {
            self.malformed(field, "integer", &Value::from(v))
        }
    }

    fn flag(&self, field: &str) -> Option<bool> {
        let value = self.fields.get(field)?;
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(*b),
            Value::Number(n) if n.as_f64() == Some(0.0) => Some(false),
            Value::Number(n) if n.as_f64() == Some(1.0) => Some(true),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => self.malformed(field, "boolean", value),
            },
            other => self.malformed(field, "boolean", other),
        }
    }

    fn benchmark(&self, key: BenchmarkKey) -> BenchmarkScore {
        let raw_value = self.number(key.raw_column());
        let normalized_score = self.number(key.score_column());
        BenchmarkScore {
            raw_value: raw_value.unwrap_or(0.0),
            normalized_score: normalized_score.unwrap_or(0.0),
            reported: normalized_score.is_some(),
        }
    }
}

/// Normalize one raw row.
///
/// Fails only when the row is not a mapping.
pub fn normalize(
    raw: &RawRecord,
    model_types: &ModelTypeTable,
) -> Result<ModelRecord, NormalizationError> {
    let identifier = raw.identifier();
    let fields = raw.fields().ok_or_else(|| NormalizationError {
        identifier: identifier.clone(),
        cause: NormalizationCause::NotAMapping {
            found: value_kind(raw.as_value()),
        },
    })?;
    let reader = FieldReader {
        fields,
        identifier: &identifier,
    };

    let name = reader.string(columns::FULLNAME);
    let precision = reader.string(columns::PRECISION);
    let sha = reader.string(columns::SHA);
    let chat_template = reader.flag(columns::CHAT_TEMPLATE);
    let id = build_record_id(
        name.as_deref(),
        precision.as_deref(),
        sha.as_deref(),
        chat_template,
    );

    let benchmarks = BenchmarkKey::ALL
        .into_iter()
        .map(|key| (key, reader.benchmark(key)))
        .collect();

    let original_type = reader.string(columns::TYPE).unwrap_or_default();
    let model_type = canonicalize_model_type(&original_type, model_types);
    if model_type != clean_model_type(&original_type) {
        debug!(model = %identifier, from = %original_type, to = %model_type, "model type mapped");
    }

    let features = Features {
        available_on_hub: reader.flag(columns::AVAILABLE_ON_HUB).unwrap_or(false),
        merged: reader.flag(columns::MERGED).unwrap_or(false),
        moe: reader.flag(columns::MOE).unwrap_or(false),
        flagged: reader.flag(columns::FLAGGED).unwrap_or(false),
        official_provider: reader.flag(columns::OFFICIAL_PROVIDERS).unwrap_or(false),
    };

    let metadata = Metadata {
        upload_date: reader.string(columns::UPLOAD_DATE),
        submission_date: reader.string(columns::SUBMISSION_DATE),
        generation: reader.integer(columns::GENERATION),
        base_model: reader.string(columns::BASE_MODEL),
        license: reader.string(columns::LICENSE),
        hearts: reader.number(columns::HEARTS),
        params_billions: reader.number(columns::PARAMS_BILLIONS),
        co2_cost: reader.number(columns::CO2_COST).unwrap_or(0.0),
    };

    Ok(ModelRecord {
        id,
        name,
        sha,
        precision,
        weight_type: reader.string(columns::WEIGHT_TYPE),
        architecture: reader.string(columns::ARCHITECTURE),
        model_type,
        average_score: reader.number(columns::AVERAGE),
        has_chat_template: chat_template.unwrap_or(false),
        benchmarks,
        features,
        metadata,
    })
}

/// Outcome of normalizing a whole batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Successfully normalized records, in input order.
    pub records: Vec<ModelRecord>,
    /// Number of rows that failed to normalize.
    pub error_count: usize,
    pub errors: Vec<NormalizationError>,
    /// Ids produced by more than one row. Reported, never merged.
    pub duplicate_ids: Vec<String>,
    /// Number of input rows.
    pub total: usize,
}

impl NormalizedBatch {
    /// Count of records per canonical model type.
    pub fn type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.model_type.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Normalize every row, skipping and counting rows that fail.
pub fn normalize_batch(raw: &[RawRecord], model_types: &ModelTypeTable) -> NormalizedBatch {
    let total = raw.len();
    let progress_step = (total / 10).max(1);
    let mut batch = NormalizedBatch {
        total,
        ..NormalizedBatch::default()
    };
    let mut seen = HashSet::new();
    let mut reported_dupes = HashSet::new();

    for (idx, row) in raw.iter().enumerate() {
        match normalize(row, model_types) {
            Ok(record) => {
                if !seen.insert(record.id.clone()) && reported_dupes.insert(record.id.clone()) {
                    obs::emit_duplicate_id(&record.id);
                    batch.duplicate_ids.push(record.id.clone());
                }
                METRICS.inc_records_normalized();
                batch.records.push(record);
            }
            Err(err) => {
                obs::emit_record_rejected(idx + 1, total, &err);
                METRICS.inc_records_rejected();
                batch.error_count += 1;
                batch.errors.push(err);
            }
        }

        let done = idx + 1;
        if done % progress_step == 0 {
            debug!(processed = done, total = total, "normalization progress");
        }
    }

    obs::emit_batch_normalized(total, batch.records.len(), batch.error_count);
    for (model_type, count) in batch.type_counts() {
        info!(model_type = %model_type, count = count, "model type distribution");
    }
    batch
}
