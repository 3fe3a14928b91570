//! Report configuration: domain weight tables and model-type canonicalization.
//!
//! Both tables are fixed data. [`ReportConfig::default`] carries the built-in
//! values; a TOML file can override any top-level section.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::domain::{BenchmarkKey, ModelRankError, Result};
use crate::normalize::clean_model_type;

/// Canonical tag every fine-tuning spelling variant collapses to.
pub const FINE_TUNED_TAG: &str = "fined-tuned-on-domain-specific-dataset";

const FINE_TUNED_VARIANTS: &[&str] = &[
    "fine-tuned",
    "fine tuned",
    "finetuned",
    "fine_tuned",
    "ft",
    "finetuning",
    "fine tuning",
    "fine-tuning",
    "fine-tuned on domain-specific datasets",
];

/// A benchmark and its weight within one domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeight {
    pub metric: BenchmarkKey,
    pub weight: f64,
}

impl MetricWeight {
    pub fn new(metric: BenchmarkKey, weight: f64) -> Self {
        Self { metric, weight }
    }
}

/// One professional domain and its weighted benchmark subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Lookup key, e.g. `"medical"`.
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub icon: String,
    /// Ordered; the order is kept in `used_metrics`.
    pub weights: Vec<MetricWeight>,
}

impl DomainConfig {
    pub fn new(key: &str, display_name: &str, icon: &str, weights: Vec<MetricWeight>) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            icon: icon.to_string(),
            weights,
        }
    }

    /// Configured metrics in table order.
    pub fn metrics(&self) -> Vec<BenchmarkKey> {
        self.weights.iter().map(|w| w.metric).collect()
    }
}

/// Maps cleaned model-type spellings to a canonical tag.
///
/// Keys are cleaned on construction so lookups match the output of
/// [`clean_model_type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ModelTypeTable {
    entries: BTreeMap<String, String>,
}

impl ModelTypeTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (clean_model_type(k.as_ref()), v.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, cleaned: &str) -> Option<&str> {
        self.entries.get(cleaned).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every target must be a fixed point: already clean and not itself
    /// remapped to something else. Keeps canonicalization idempotent.
    fn validate(&self) -> Result<()> {
        for (variant, target) in &self.entries {
            if clean_model_type(target) != *target {
                return Err(ModelRankError::Config(format!(
                    "model type target {target:?} for {variant:?} is not in canonical form"
                )));
            }
            if let Some(next) = self.entries.get(target) {
                if next != target {
                    return Err(ModelRankError::Config(format!(
                        "model type target {target:?} is itself remapped to {next:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for ModelTypeTable {
    fn default() -> Self {
        Self::new(FINE_TUNED_VARIANTS.iter().map(|v| (*v, FINE_TUNED_TAG)))
    }
}

impl From<BTreeMap<String, String>> for ModelTypeTable {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self::new(entries)
    }
}

impl From<ModelTypeTable> for BTreeMap<String, String> {
    fn from(table: ModelTypeTable) -> Self {
        table.entries
    }
}

/// Full report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub domains: Vec<DomainConfig>,
    pub model_types: ModelTypeTable,
    /// Rows shown in the rendered overall table.
    pub overall_limit: usize,
    /// Rows shown in each rendered domain table.
    pub domain_limit: usize,
    /// Where the HTML pages are published, as seen from the README. Either a
    /// relative path or an absolute URL.
    pub pages_url: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        use BenchmarkKey::*;
        Self {
            domains: vec![
                DomainConfig::new(
                    "medical",
                    "Medical",
                    "🏥",
                    vec![
                        MetricWeight::new(MmluPro, 0.5),
                        MetricWeight::new(Bbh, 0.3),
                        MetricWeight::new(Gpqa, 0.2),
                    ],
                ),
                DomainConfig::new(
                    "legal",
                    "Legal",
                    "⚖️",
                    vec![MetricWeight::new(MmluPro, 0.6), MetricWeight::new(Bbh, 0.4)],
                ),
                DomainConfig::new(
                    "finance",
                    "Finance",
                    "💰",
                    vec![
                        MetricWeight::new(Math, 0.5),
                        MetricWeight::new(MmluPro, 0.3),
                        MetricWeight::new(Bbh, 0.2),
                    ],
                ),
            ],
            model_types: ModelTypeTable::default(),
            overall_limit: 20,
            domain_limit: 10,
            pages_url: "docs".to_string(),
        }
    }
}

impl ReportConfig {
    /// Parse and validate a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReportConfig =
            toml::from_str(content).map_err(|e| ModelRankError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Look up a configured domain.
    pub fn domain(&self, key: &str) -> Option<&DomainConfig> {
        self.domains.iter().find(|d| d.key == key)
    }

    pub fn domain_keys(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.key.as_str()).collect()
    }

    /// Link to a published page, e.g. `docs/medical_leaderboard.html`.
    pub fn page_link(&self, file: &str) -> String {
        let base = self.pages_url.trim_end_matches('/');
        if base.is_empty() {
            file.to_string()
        } else {
            format!("{base}/{file}")
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for domain in &self.domains {
            if domain.key.trim().is_empty() {
                return Err(ModelRankError::Config(
                    "domain key must not be empty".into(),
                ));
            }
            if !seen.insert(domain.key.as_str()) {
                return Err(ModelRankError::Config(format!(
                    "duplicate domain key: {}",
                    domain.key
                )));
            }
            if domain.weights.is_empty() {
                return Err(ModelRankError::Config(format!(
                    "domain {} has no metric weights",
                    domain.key
                )));
            }
            let mut metrics = HashSet::new();
            for w in &domain.weights {
                if !w.weight.is_finite() || w.weight <= 0.0 {
                    return Err(ModelRankError::Config(format!(
                        "domain {}: weight for {} must be a positive number, got {}",
                        domain.key,
                        w.metric.as_str(),
                        w.weight
                    )));
                }
                if !metrics.insert(w.metric) {
                    return Err(ModelRankError::Config(format!(
                        "domain {}: metric {} listed twice",
                        domain.key,
                        w.metric.as_str()
                    )));
                }
            }
        }
        self.model_types.validate()
    }
}
