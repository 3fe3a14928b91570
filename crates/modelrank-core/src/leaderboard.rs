//! Overall leaderboard: canonical records ranked by their upstream average.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::ModelRecord;

/// One ranked row of the overall leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallEntry {
    pub rank: usize,
    pub model_id: String,
    pub record_index: usize,
    pub average_score: Option<f64>,
}

/// Rank records descending by `average_score`.
///
/// Records without an average sort last; ties keep input order.
pub fn overall_leaderboard(records: &[ModelRecord]) -> Vec<OverallEntry> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(
        |&a, &b| match (records[a].average_score, records[b].average_score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    );

    order
        .into_iter()
        .enumerate()
        .map(|(position, record_index)| OverallEntry {
            rank: position + 1,
            model_id: records[record_index].id.clone(),
            record_index,
            average_score: records[record_index].average_score,
        })
        .collect()
}
