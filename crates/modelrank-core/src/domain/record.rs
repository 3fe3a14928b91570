//! Canonical, typed model records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The six benchmarks reported by the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkKey {
    Ifeval,
    Bbh,
    Math,
    Gpqa,
    Musr,
    MmluPro,
}

impl BenchmarkKey {
    /// All benchmarks, in leaderboard column order.
    pub const ALL: [BenchmarkKey; 6] = [
        BenchmarkKey::Ifeval,
        BenchmarkKey::Bbh,
        BenchmarkKey::Math,
        BenchmarkKey::Gpqa,
        BenchmarkKey::Musr,
        BenchmarkKey::MmluPro,
    ];

    /// Stable snake_case key.
    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkKey::Ifeval => "ifeval",
            BenchmarkKey::Bbh => "bbh",
            BenchmarkKey::Math => "math",
            BenchmarkKey::Gpqa => "gpqa",
            BenchmarkKey::Musr => "musr",
            BenchmarkKey::MmluPro => "mmlu_pro",
        }
    }

    /// Upstream column holding the normalized score.
    pub fn score_column(&self) -> &'static str {
        match self {
            BenchmarkKey::Ifeval => "IFEval",
            BenchmarkKey::Bbh => "BBH",
            BenchmarkKey::Math => "MATH Lvl 5",
            BenchmarkKey::Gpqa => "GPQA",
            BenchmarkKey::Musr => "MUSR",
            BenchmarkKey::MmluPro => "MMLU-PRO",
        }
    }

    /// Upstream column holding the raw metric value.
    pub fn raw_column(&self) -> &'static str {
        match self {
            BenchmarkKey::Ifeval => "IFEval Raw",
            BenchmarkKey::Bbh => "BBH Raw",
            BenchmarkKey::Math => "MATH Lvl 5 Raw",
            BenchmarkKey::Gpqa => "GPQA Raw",
            BenchmarkKey::Musr => "MUSR Raw",
            BenchmarkKey::MmluPro => "MMLU-PRO Raw",
        }
    }

    /// Short header used in rendered tables.
    pub fn label(&self) -> &'static str {
        match self {
            BenchmarkKey::Math => "MATH",
            other => other.score_column(),
        }
    }
}

impl fmt::Display for BenchmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One benchmark result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkScore {
    pub raw_value: f64,
    pub normalized_score: f64,
    /// Whether the upstream row carried the normalized score column.
    /// Absent scores still read as 0 but do not count towards domain averages.
    pub reported: bool,
}

impl BenchmarkScore {
    pub fn missing() -> Self {
        Self {
            raw_value: 0.0,
            normalized_score: 0.0,
            reported: false,
        }
    }
}

/// Boolean feature flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub available_on_hub: bool,
    pub merged: bool,
    pub moe: bool,
    pub flagged: bool,
    pub official_provider: bool,
}

/// Submission metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub upload_date: Option<String>,
    pub submission_date: Option<String>,
    pub generation: Option<i64>,
    pub base_model: Option<String>,
    pub license: Option<String>,
    pub hearts: Option<f64>,
    pub params_billions: Option<f64>,
    pub co2_cost: f64,
}

/// Canonical representation of one submitted evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// `fullname_precision_sha_chattemplate`; unique per evaluation.
    pub id: String,
    pub name: Option<String>,
    pub sha: Option<String>,
    pub precision: Option<String>,
    pub weight_type: Option<String>,
    pub architecture: Option<String>,
    /// Canonicalized model type tag (may be empty).
    pub model_type: String,
    pub average_score: Option<f64>,
    pub has_chat_template: bool,
    /// Always holds all six benchmarks.
    pub benchmarks: BTreeMap<BenchmarkKey, BenchmarkScore>,
    pub features: Features,
    pub metadata: Metadata,
}

impl ModelRecord {
    /// Score for a benchmark, defaulting to zeros.
    pub fn benchmark(&self, key: BenchmarkKey) -> BenchmarkScore {
        self.benchmarks
            .get(&key)
            .copied()
            .unwrap_or_else(BenchmarkScore::missing)
    }

    /// Normalized score if this record reported the benchmark.
    pub fn metric_value(&self, key: BenchmarkKey) -> Option<f64> {
        self.benchmarks
            .get(&key)
            .filter(|score| score.reported)
            .map(|score| score.normalized_score)
    }

    /// Display name, `"Unknown"` when the row had no fullname.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}
