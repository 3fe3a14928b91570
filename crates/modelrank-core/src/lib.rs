//! ModelRank Core Library
//!
//! Turns raw Open LLM Leaderboard rows into canonical model records, an
//! overall leaderboard and weighted per-domain leaderboards, and writes the
//! resulting report artifacts.

pub mod config;
pub mod domain;
pub mod leaderboard;
pub mod metrics;
pub mod normalize;
pub mod obs;
pub mod pipeline;
pub mod reporting;
pub mod scoring;
pub mod source;
pub mod telemetry;

pub use config::{DomainConfig, MetricWeight, ModelTypeTable, ReportConfig, FINE_TUNED_TAG};

pub use domain::{
    columns, BenchmarkKey, BenchmarkScore, FetchError, Features, Metadata, ModelRankError,
    ModelRecord, NormalizationCause, NormalizationError, RawRecord, Result, ScoringError,
};

pub use leaderboard::{overall_leaderboard, OverallEntry};
pub use normalize::{
    build_record_id, canonicalize_model_type, clean_model_type, normalize, normalize_batch,
    NormalizedBatch,
};
pub use pipeline::{
    build_report, run_report, snapshot_digest, DomainOutcome, DomainStatus, LeaderboardReport,
    ReportSummary,
};
pub use reporting::{
    domain_artifact, leaderboard_artifact, patch_readme_section, render_domain_csv,
    render_domain_html, render_domain_md, render_overall_csv, render_overall_html,
    render_overall_md, render_report_md, update_readme, upsert_readme_section, write_json,
    write_report, DomainArtifact, DomainRow, LeaderboardArtifact, NavLink, OverallRow,
    WrittenArtifacts,
};
pub use scoring::{score_domain, DomainLeaderboard, DomainLeaderboardEntry, DomainScorer};
pub use source::{MemorySource, RecordSource};

pub use metrics::METRICS;
pub use obs::{
    emit_batch_normalized, emit_domain_failed, emit_domain_scored, emit_report_finished,
    emit_report_started, ReportSpan,
};
pub use telemetry::init_tracing;

/// ModelRank version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
