use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::config::{DomainConfig, ReportConfig};
use crate::domain::{BenchmarkKey, ModelRecord};
use crate::pipeline::{DomainOutcome, LeaderboardReport};
use crate::scoring::DomainLeaderboard;

mod csv;
mod html;

pub use csv::{render_domain_csv, render_overall_csv};
pub use html::{render_domain_html, render_overall_html, NavLink};

pub const SCHEMA_VERSION: &str = "1.0";

/// README heading of the overall leaderboard section.
pub const OVERALL_SECTION: &str = "🏆 ModelRank AI Leaderboard";

/// README heading of the list of domain pages.
pub const DOMAIN_LINKS_SECTION: &str = "🌐 Domain-Specific Leaderboards";

/// Sections appended to a README that lacks them. Never rewritten.
const STANDING_SECTIONS: &[(&str, &str)] = &[
    (
        "Data Source",
        "Data is sourced from the [HuggingFace Open LLM Leaderboard](https://huggingface.co/spaces/open-llm-leaderboard/open_llm_leaderboard).",
    ),
    (
        "License",
        "This project is open-sourced under the [MIT License](LICENSE).",
    ),
];

const HUB_MODEL_URL: &str = "https://huggingface.co";

/// One model in leaderboard.json.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverallRow {
    pub rank: usize,
    pub model_id: String,
    pub name: Option<String>,
    pub model_type: String,
    pub average_score: Option<f64>,
    pub params_billions: Option<f64>,
    /// Normalized scores; `None` when the row did not report the benchmark.
    pub scores: BTreeMap<BenchmarkKey, Option<f64>>,
}

/// Canonical overall leaderboard artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub snapshot_digest: String,
    pub total_models: usize,
    pub models: Vec<OverallRow>,
}

/// One model in `<domain>_leaderboard.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainRow {
    pub rank: usize,
    pub model_id: String,
    pub name: Option<String>,
    pub domain_average: f64,
    pub params_billions: Option<f64>,
    /// Scores for the board's used metrics only.
    pub scores: BTreeMap<BenchmarkKey, Option<f64>>,
}

/// Canonical per-domain leaderboard artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub snapshot_digest: String,
    pub domain: String,
    pub title: String,
    pub used_metrics: Vec<BenchmarkKey>,
    pub skipped_metrics: Vec<BenchmarkKey>,
    pub dropped: usize,
    pub models: Vec<DomainRow>,
}

/// Paths written by [`write_report`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrittenArtifacts {
    pub paths: Vec<PathBuf>,
}

fn scores_for(
    record: &ModelRecord,
    keys: &[BenchmarkKey],
) -> BTreeMap<BenchmarkKey, Option<f64>> {
    keys.iter()
        .map(|key| (*key, record.metric_value(*key)))
        .collect()
}

/// Section title for a domain, e.g. `🏥 Medical Domain Leaderboard`.
pub fn domain_title(domain: &DomainConfig) -> String {
    let title = format!("{} Domain Leaderboard", domain.display_name);
    if domain.icon.is_empty() {
        title
    } else {
        format!("{} {}", domain.icon, title)
    }
}

pub fn leaderboard_artifact(report: &LeaderboardReport) -> LeaderboardArtifact {
    let records = &report.batch.records;
    let models = report
        .overall
        .iter()
        .filter_map(|entry| {
            let record = records.get(entry.record_index)?;
            Some(OverallRow {
                rank: entry.rank,
                model_id: entry.model_id.clone(),
                name: record.name.clone(),
                model_type: record.model_type.clone(),
                average_score: entry.average_score,
                params_billions: record.metadata.params_billions,
                scores: scores_for(record, &BenchmarkKey::ALL),
            })
        })
        .collect::<Vec<_>>();

    LeaderboardArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        generated_at: report.generated_at,
        run_id: report.run_id,
        snapshot_digest: report.snapshot_digest.clone(),
        total_models: models.len(),
        models,
    }
}

pub fn domain_artifact(
    report: &LeaderboardReport,
    board: &DomainLeaderboard,
    domain: &DomainConfig,
) -> DomainArtifact {
    let models = board
        .resolve(&report.batch.records)
        .map(|(entry, record)| DomainRow {
            rank: entry.rank,
            model_id: entry.model_id.clone(),
            name: record.name.clone(),
            domain_average: entry.domain_average,
            params_billions: record.metadata.params_billions,
            scores: scores_for(record, &board.used_metrics),
        })
        .collect();

    DomainArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        generated_at: report.generated_at,
        run_id: report.run_id,
        snapshot_digest: report.snapshot_digest.clone(),
        domain: board.domain.clone(),
        title: domain_title(domain),
        used_metrics: board.used_metrics.clone(),
        skipped_metrics: board.skipped_metrics.clone(),
        dropped: board.dropped,
        models,
    }
}

fn model_link(model_id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("[{name}]({HUB_MODEL_URL}/{name})"),
        _ => model_id.to_string(),
    }
}

fn score_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn params_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn table_header(out: &mut String, columns: &[&str]) {
    out.push_str(&format!("| {} |\n", columns.join(" | ")));
    out.push_str(&format!("|{}\n", " --- |".repeat(columns.len())));
}

/// Render the top `limit` rows of the overall board as a Markdown table.
pub fn render_overall_md(artifact: &LeaderboardArtifact, limit: usize) -> String {
    if artifact.models.is_empty() {
        return "No data available\n".to_string();
    }
    let mut columns = vec!["Rank", "Model", "Average Score", "Parameters(B)"];
    columns.extend(BenchmarkKey::ALL.iter().map(BenchmarkKey::label));

    let mut out = String::new();
    table_header(&mut out, &columns);
    for row in artifact.models.iter().take(limit) {
        let mut cells = vec![
            row.rank.to_string(),
            model_link(&row.model_id, row.name.as_deref()),
            score_cell(row.average_score),
            params_cell(row.params_billions),
        ];
        cells.extend(
            BenchmarkKey::ALL
                .iter()
                .map(|key| score_cell(row.scores.get(key).copied().flatten())),
        );
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// Render the top `limit` rows of a domain board as a Markdown table.
pub fn render_domain_md(artifact: &DomainArtifact, limit: usize) -> String {
    if artifact.models.is_empty() {
        return format!("No data available for the {} domain.\n", artifact.domain);
    }
    let mut columns = vec!["Rank", "Model", "Avg Score", "Parameters(B)"];
    columns.extend(artifact.used_metrics.iter().map(BenchmarkKey::label));

    let mut out = String::new();
    table_header(&mut out, &columns);
    for row in artifact.models.iter().take(limit) {
        let mut cells = vec![
            row.rank.to_string(),
            model_link(&row.model_id, row.name.as_deref()),
            score_cell(Some(row.domain_average)),
            params_cell(row.params_billions),
        ];
        cells.extend(
            artifact
                .used_metrics
                .iter()
                .map(|key| score_cell(row.scores.get(key).copied().flatten())),
        );
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

fn last_updated(at: DateTime<Utc>) -> String {
    format!("*Last updated: {}*", at.format("%Y-%m-%d %H:%M:%S UTC"))
}

/// Full Markdown document for `leaderboard.md`.
pub fn render_report_md(report: &LeaderboardReport, config: &ReportConfig) -> String {
    let mut out = String::new();
    out.push_str("# ModelRank AI Leaderboard\n\n");
    out.push_str(&last_updated(report.generated_at));
    out.push_str("\n\n");
    out.push_str(&format!("## {OVERALL_SECTION}\n\n"));
    out.push_str(&render_overall_md(
        &leaderboard_artifact(report),
        config.overall_limit,
    ));

    for domain in &config.domains {
        out.push_str(&format!("\n## {}\n\n", domain_title(domain)));
        match report.domain(&domain.key) {
            Some(DomainOutcome::Scored(board)) => {
                let artifact = domain_artifact(report, board, domain);
                out.push_str(&render_domain_md(&artifact, config.domain_limit));
            }
            Some(DomainOutcome::Failed { error, .. }) => {
                out.push_str(&format!("Not available in this run: {error}\n"));
            }
            None => out.push_str("Not scored.\n"),
        }
    }
    out
}

/// Byte offset of the `## {heading}` line, if present as a whole line.
fn find_section(content: &str, marker: &str) -> Option<usize> {
    content.match_indices(marker).map(|(i, _)| i).find(|&i| {
        let at_line_start = i == 0 || content.as_bytes()[i - 1] == b'\n';
        let rest = &content[i + marker.len()..];
        at_line_start && (rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n"))
    })
}

/// Replace the section starting at `## {heading}` up to the next `## ` heading
/// (or end of file) with `body`. Appends the section when it does not exist.
pub fn patch_readme_section(content: &str, heading: &str, body: &str) -> String {
    let marker = format!("## {heading}");
    let body = body.trim_end();

    match find_section(content, &marker) {
        Some(start) => {
            let after = start + marker.len();
            match content[after..].find("\n## ") {
                Some(offset) => {
                    let next = after + offset + 1;
                    format!(
                        "{}{marker}\n\n{body}\n\n{}",
                        &content[..start],
                        &content[next..]
                    )
                }
                None => format!("{}{marker}\n\n{body}\n", &content[..start]),
            }
        }
        None => {
            let mut out = content.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{marker}\n\n{body}\n"));
            out
        }
    }
}

/// Patch `heading` in place, or insert it before the first of `before` that
/// exists. Falls back to appending.
pub fn upsert_readme_section(
    content: &str,
    heading: &str,
    body: &str,
    before: &[&str],
) -> String {
    let marker = format!("## {heading}");
    if find_section(content, &marker).is_some() {
        return patch_readme_section(content, heading, body);
    }
    let anchor = before
        .iter()
        .find_map(|next| find_section(content, &format!("## {next}")));
    match anchor {
        Some(at) => format!(
            "{}{marker}\n\n{}\n\n{}",
            &content[..at],
            body.trim_end(),
            &content[at..]
        ),
        None => patch_readme_section(content, heading, body),
    }
}

fn domain_page(domain: &DomainConfig) -> String {
    format!("{}_leaderboard.html", domain.key)
}

fn domain_links_md(config: &ReportConfig) -> String {
    let mut out =
        String::from("Explore leaderboards focused on specific professional areas:\n\n");
    for domain in &config.domains {
        out.push_str(&format!(
            "- [{}]({})\n",
            domain_title(domain),
            config.page_link(&domain_page(domain))
        ));
    }
    out
}

/// Patch the overall section and every scored domain's section of a README.
///
/// Sections of failed domains are left untouched. A missing README is created,
/// and the domain links, data source and license sections are added when
/// absent.
pub fn update_readme(
    path: &Path,
    report: &LeaderboardReport,
    config: &ReportConfig,
) -> Result<()> {
    let mut content = if path.exists() {
        std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?
    } else {
        "# ModelRank AI\n\nAn automatically updated open-source large language model leaderboard.\n"
            .to_string()
    };
    let stamp = last_updated(report.generated_at);
    let standing: Vec<&str> = STANDING_SECTIONS.iter().map(|(title, _)| *title).collect();

    let overall = render_overall_md(&leaderboard_artifact(report), config.overall_limit);
    content = upsert_readme_section(
        &content,
        OVERALL_SECTION,
        &format!(
            "{stamp}\n\n{overall}\n[View Complete Online Leaderboard]({})",
            config.page_link("index.html")
        ),
        &standing,
    );
    content = upsert_readme_section(
        &content,
        DOMAIN_LINKS_SECTION,
        &domain_links_md(config),
        &standing,
    );

    for domain in &config.domains {
        if let Some(DomainOutcome::Scored(board)) = report.domain(&domain.key) {
            let artifact = domain_artifact(report, board, domain);
            let table = render_domain_md(&artifact, config.domain_limit);
            content = upsert_readme_section(
                &content,
                &domain_title(domain),
                &format!(
                    "{stamp}\n\n{table}\n[View Full {} Leaderboard]({})",
                    domain.display_name,
                    config.page_link(&domain_page(domain))
                ),
                &standing,
            );
        }
    }

    for (title, text) in STANDING_SECTIONS {
        if find_section(&content, &format!("## {title}")).is_none() {
            content = patch_readme_section(&content, title, text);
        }
    }

    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    info!(path = %path.display(), "readme updated");
    Ok(())
}

/// Write any artifact as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(artifact).context("serialize artifact")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))
}

/// Navigation links to the main page and every scored domain page except
/// `current`.
fn page_nav(
    report: &LeaderboardReport,
    config: &ReportConfig,
    current: Option<&str>,
) -> Vec<NavLink> {
    let mut links = Vec::new();
    if current.is_some() {
        links.push(NavLink::new("Main Leaderboard", "index.html"));
    }
    for domain in &config.domains {
        let scored = matches!(report.domain(&domain.key), Some(DomainOutcome::Scored(_)));
        if scored && current != Some(domain.key.as_str()) {
            let label = format!("{} {}", domain.icon, domain.display_name);
            links.push(NavLink::new(label.trim(), domain_page(domain)));
        }
    }
    links
}

/// Write every artifact of a run into `out_dir`, creating it if needed.
///
/// Failed domains get no `<domain>_leaderboard.*` files; their status is in
/// `report_summary.json`.
pub fn write_report(
    out_dir: &Path,
    report: &LeaderboardReport,
    config: &ReportConfig,
) -> Result<WrittenArtifacts> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;
    let mut written = WrittenArtifacts::default();

    let overall = leaderboard_artifact(report);
    let overall_path = out_dir.join("leaderboard.json");
    write_json(&overall_path, &overall)?;
    written.paths.push(overall_path);

    let csv_path = out_dir.join("leaderboard.csv");
    write_text(&csv_path, &render_overall_csv(&overall))?;
    written.paths.push(csv_path);

    let index_path = out_dir.join("index.html");
    write_text(
        &index_path,
        &render_overall_html(&overall, &page_nav(report, config, None)),
    )?;
    written.paths.push(index_path);

    for domain in &config.domains {
        if let Some(DomainOutcome::Scored(board)) = report.domain(&domain.key) {
            let artifact = domain_artifact(report, board, domain);

            let path = out_dir.join(format!("{}_leaderboard.json", domain.key));
            write_json(&path, &artifact)?;
            written.paths.push(path);

            let path = out_dir.join(format!("{}_leaderboard.csv", domain.key));
            write_text(&path, &render_domain_csv(&artifact))?;
            written.paths.push(path);

            let path = out_dir.join(domain_page(domain));
            let nav = page_nav(report, config, Some(&domain.key));
            write_text(&path, &render_domain_html(&artifact, &nav))?;
            written.paths.push(path);
        }
    }

    let summary_path = out_dir.join("report_summary.json");
    write_json(&summary_path, &report.summary())?;
    written.paths.push(summary_path);

    let md_path = out_dir.join("leaderboard.md");
    write_text(&md_path, &render_report_md(report, config))?;
    written.paths.push(md_path);

    info!(
        out_dir = %out_dir.display(),
        files = written.paths.len(),
        "report artifacts written"
    );
    Ok(written)
}
