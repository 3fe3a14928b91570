//! CSV exports of the overall and per-domain leaderboards.
//!
//! Columns use the same snake_case keys as the JSON artifacts. Missing values
//! are empty cells.

use super::{DomainArtifact, LeaderboardArtifact};
use crate::domain::BenchmarkKey;

fn needs_quotes(field: &str) -> bool {
    field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r'))
}

fn push_row(out: &mut String, row: &[String]) {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| {
            if needs_quotes(cell) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.clone()
            }
        })
        .collect();
    out.push_str(&cells.join(","));
    out.push('\n');
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn header(fixed: &[&str], metrics: &[BenchmarkKey]) -> Vec<String> {
    fixed
        .iter()
        .map(|c| c.to_string())
        .chain(metrics.iter().map(|key| key.as_str().to_string()))
        .collect()
}

/// `leaderboard.csv`: one line per ranked model, all benchmarks.
pub fn render_overall_csv(artifact: &LeaderboardArtifact) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &header(
            &[
                "rank",
                "model_id",
                "name",
                "model_type",
                "average_score",
                "params_billions",
            ],
            &BenchmarkKey::ALL,
        ),
    );
    for row in &artifact.models {
        let mut cells = vec![
            row.rank.to_string(),
            row.model_id.clone(),
            row.name.clone().unwrap_or_default(),
            row.model_type.clone(),
            number(row.average_score),
            number(row.params_billions),
        ];
        cells.extend(
            BenchmarkKey::ALL
                .iter()
                .map(|key| number(row.scores.get(key).copied().flatten())),
        );
        push_row(&mut out, &cells);
    }
    out
}

/// `<domain>_leaderboard.csv`: one line per ranked entry, used metrics only.
pub fn render_domain_csv(artifact: &DomainArtifact) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &header(
            &[
                "rank",
                "model_id",
                "name",
                "domain_average",
                "params_billions",
            ],
            &artifact.used_metrics,
        ),
    );
    for row in &artifact.models {
        let mut cells = vec![
            row.rank.to_string(),
            row.model_id.clone(),
            row.name.clone().unwrap_or_default(),
            row.domain_average.to_string(),
            number(row.params_billions),
        ];
        cells.extend(
            artifact
                .used_metrics
                .iter()
                .map(|key| number(row.scores.get(key).copied().flatten())),
        );
        push_row(&mut out, &cells);
    }
    out
}
