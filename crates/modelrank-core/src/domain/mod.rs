//! Domain models for ModelRank.
//!
//! - `RawRecord`: one untyped row from the leaderboard dataset
//! - `ModelRecord`: the canonical, typed record all downstream logic uses
//! - error taxonomy for normalization, scoring and fetching

pub mod error;
pub mod raw;
pub mod record;

pub use error::{
    FetchError, ModelRankError, NormalizationCause, NormalizationError, Result, ScoringError,
};
pub use raw::{columns, RawRecord};
pub use record::{BenchmarkKey, BenchmarkScore, Features, Metadata, ModelRecord};
