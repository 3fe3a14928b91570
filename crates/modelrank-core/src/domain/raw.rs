//! Untyped rows as delivered by the leaderboard dataset.
//!
//! Upstream column names carry punctuation and emoji and drift between
//! dataset snapshots. They are only ever read through [`columns`] at the
//! normalization boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream column names of the `contents` leaderboard dataset.
pub mod columns {
    pub const FULLNAME: &str = "fullname";
    pub const PRECISION: &str = "Precision";
    pub const SHA: &str = "Model sha";
    pub const CHAT_TEMPLATE: &str = "Chat Template";
    pub const TYPE: &str = "Type";
    pub const WEIGHT_TYPE: &str = "Weight type";
    pub const ARCHITECTURE: &str = "Architecture";
    pub const AVERAGE: &str = "Average ⬆️";

    pub const AVAILABLE_ON_HUB: &str = "Available on the hub";
    pub const MERGED: &str = "Merged";
    pub const MOE: &str = "MoE";
    pub const FLAGGED: &str = "Flagged";
    pub const OFFICIAL_PROVIDERS: &str = "Official Providers";

    pub const UPLOAD_DATE: &str = "Upload To Hub Date";
    pub const SUBMISSION_DATE: &str = "Submission Date";
    pub const GENERATION: &str = "Generation";
    pub const BASE_MODEL: &str = "Base Model";
    pub const LICENSE: &str = "Hub License";
    pub const HEARTS: &str = "Hub ❤️";
    pub const PARAMS_BILLIONS: &str = "#Params (B)";
    pub const CO2_COST: &str = "CO₂ cost (kg)";
}

/// One row of evaluation data, exactly as fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Field map, or `None` when the row is not a mapping.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Look up a field; `None` when absent or when the row is not a mapping.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields().and_then(|m| m.get(field))
    }

    /// Best-effort identifier used in diagnostics.
    pub fn identifier(&self) -> String {
        match self.get(columns::FULLNAME) {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => "Unknown".to_string(),
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// JSON type name, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
