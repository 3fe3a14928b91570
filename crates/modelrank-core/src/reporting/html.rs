//! Static HTML pages for the overall and per-domain leaderboards.
//!
//! Pages are filled into a single template. Every value coming from the
//! dataset or the configuration is escaped before it is inserted.

use chrono::{DateTime, Datelike, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{params_cell, score_cell, DomainArtifact, LeaderboardArtifact, HUB_MODEL_URL};
use crate::domain::BenchmarkKey;

const PAGE_TEMPLATE: &str = include_str!("templates/leaderboard.html");

/// A button on a page's navigation card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

fn link_buttons(links: &[NavLink], class: &str) -> String {
    links
        .iter()
        .map(|link| {
            format!(
                "<a href=\"{}\" class=\"btn {class} me-2 mb-2\">{}</a>",
                encode_double_quoted_attribute(&link.href),
                encode_text(&link.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn model_cell(model_id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!(
            "<a href=\"{HUB_MODEL_URL}/{}\" target=\"_blank\">{}</a>",
            encode_double_quoted_attribute(name),
            encode_text(name)
        ),
        _ => encode_text(model_id).into_owned(),
    }
}

/// `rows` hold already-escaped cell markup.
fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from(
        "<table id=\"leaderboard\" class=\"table table-striped table-hover table-bordered\">\n",
    );
    out.push_str("<thead>\n<tr>");
    for column in columns {
        out.push_str(&format!("<th>{}</th>", encode_text(column)));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}

struct Page<'a> {
    title: &'a str,
    updated: DateTime<Utc>,
    nav: &'a [NavLink],
    downloads: &'a [NavLink],
    table: String,
}

fn render_page(page: Page<'_>) -> String {
    PAGE_TEMPLATE
        .replace("{{{TITLE}}}", &encode_text(page.title))
        .replace("{{{HEADING}}}", &encode_text(page.title))
        .replace(
            "{{{UPDATED}}}",
            &page.updated.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
        .replace("{{{YEAR}}}", &page.updated.year().to_string())
        .replace("{{{NAV}}}", &link_buttons(page.nav, "btn-outline-primary"))
        .replace(
            "{{{DOWNLOADS}}}",
            &link_buttons(page.downloads, "btn-outline-secondary"),
        )
        // Last: the table carries dataset values.
        .replace("{{{TABLE}}}", &page.table)
}

fn downloads(stem: &str) -> Vec<NavLink> {
    vec![
        NavLink::new("JSON", format!("{stem}.json")),
        NavLink::new("CSV", format!("{stem}.csv")),
    ]
}

/// `index.html`: every model of the overall board.
pub fn render_overall_html(artifact: &LeaderboardArtifact, nav: &[NavLink]) -> String {
    let table = if artifact.models.is_empty() {
        "<p>No data available</p>".to_string()
    } else {
        let mut columns = vec!["Rank", "Model", "Average Score", "Parameters(B)"];
        columns.extend(BenchmarkKey::ALL.iter().map(BenchmarkKey::label));
        let rows: Vec<Vec<String>> = artifact
            .models
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.rank.to_string(),
                    model_cell(&row.model_id, row.name.as_deref()),
                    score_cell(row.average_score),
                    params_cell(row.params_billions),
                ];
                cells.extend(
                    BenchmarkKey::ALL
                        .iter()
                        .map(|key| score_cell(row.scores.get(key).copied().flatten())),
                );
                cells
            })
            .collect();
        render_table(&columns, &rows)
    };

    render_page(Page {
        title: "ModelRank AI - Open LLM Leaderboard",
        updated: artifact.generated_at,
        nav,
        downloads: &downloads("leaderboard"),
        table,
    })
}

/// `<domain>_leaderboard.html`: every entry of one domain board.
pub fn render_domain_html(artifact: &DomainArtifact, nav: &[NavLink]) -> String {
    let table = if artifact.models.is_empty() {
        format!(
            "<p>No data available for the {} domain</p>",
            encode_text(&artifact.domain)
        )
    } else {
        let mut columns = vec!["Rank", "Model", "Average Score", "Parameters(B)"];
        columns.extend(artifact.used_metrics.iter().map(BenchmarkKey::label));
        let rows: Vec<Vec<String>> = artifact
            .models
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.rank.to_string(),
                    model_cell(&row.model_id, row.name.as_deref()),
                    score_cell(Some(row.domain_average)),
                    params_cell(row.params_billions),
                ];
                cells.extend(
                    artifact
                        .used_metrics
                        .iter()
                        .map(|key| score_cell(row.scores.get(key).copied().flatten())),
                );
                cells
            })
            .collect();
        render_table(&columns, &rows)
    };

    render_page(Page {
        title: &format!("ModelRank AI - {}", artifact.title),
        updated: artifact.generated_at,
        nav,
        downloads: &downloads(&format!("{}_leaderboard", artifact.domain)),
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::{DomainRow, OverallRow};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn overall(models: Vec<OverallRow>) -> LeaderboardArtifact {
        LeaderboardArtifact {
            schema_version: "1.0".to_string(),
            generated_at: DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            run_id: Uuid::nil(),
            snapshot_digest: String::new(),
            total_models: models.len(),
            models,
        }
    }

    fn row(rank: usize, name: &str, average: f64) -> OverallRow {
        OverallRow {
            rank,
            model_id: format!("{name}_bfloat16_abc_True"),
            name: Some(name.to_string()),
            model_type: "pretrained".to_string(),
            average_score: Some(average),
            params_billions: Some(7.0),
            scores: BenchmarkKey::ALL
                .iter()
                .map(|key| (*key, (*key == BenchmarkKey::Bbh).then_some(41.25)))
                .collect(),
        }
    }

    #[test]
    fn overall_page_lists_every_model() {
        let models = (1..=30)
            .map(|i| row(i, &format!("org/m{i}"), 50.0 - i as f64))
            .collect();
        let html = render_overall_html(
            &overall(models),
            &[NavLink::new("🏥 Medical", "medical_leaderboard.html")],
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("{{{"));
        assert_eq!(html.matches("<tr>").count(), 31);
        assert!(html.contains(
            "<title>ModelRank AI - Open LLM Leaderboard</title>"
        ));
        assert!(html.contains("Last updated: 2024-06-01 12:00:00 UTC"));
        assert!(html.contains(
            "<a href=\"https://huggingface.co/org/m1\" target=\"_blank\">org/m1</a>"
        ));
        assert!(html.contains("<td>41.25</td>"));
        assert!(html.contains("<td>-</td>"));
        assert!(html.contains("href=\"medical_leaderboard.html\""));
        assert!(html.contains("href=\"leaderboard.csv\""));
    }

    #[test]
    fn model_names_are_escaped() {
        let html = render_overall_html(&overall(vec![row(1, "org/<script>", 1.0)]), &[]);
        assert!(!html.contains("org/<script>"));
        assert!(html.contains("org/&lt;script&gt;"));
    }

    #[test]
    fn empty_board_renders_placeholder() {
        let html = render_overall_html(&overall(Vec::new()), &[]);
        assert!(html.contains("<p>No data available</p>"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn domain_page_shows_used_metrics_only() {
        let base = overall(Vec::new());
        let artifact = DomainArtifact {
            schema_version: base.schema_version,
            generated_at: base.generated_at,
            run_id: base.run_id,
            snapshot_digest: base.snapshot_digest,
            domain: "legal".to_string(),
            title: "⚖️ Legal Domain Leaderboard".to_string(),
            used_metrics: vec![BenchmarkKey::Bbh],
            skipped_metrics: vec![BenchmarkKey::MmluPro],
            dropped: 0,
            models: vec![DomainRow {
                rank: 1,
                model_id: "org/a_Unknown_Unknown_Unknown".to_string(),
                name: None,
                domain_average: 60.0,
                params_billions: None,
                scores: BTreeMap::from([(BenchmarkKey::Bbh, Some(60.0))]),
            }],
        };
        let nav = [NavLink::new("Main Leaderboard", "index.html")];
        let html = render_domain_html(&artifact, &nav);

        assert!(html.contains(
            "<title>ModelRank AI - ⚖️ Legal Domain Leaderboard</title>"
        ));
        assert!(html.contains("<th>BBH</th>"));
        assert!(!html.contains("<th>MMLU-PRO</th>"));
        assert!(html.contains("<td>org/a_Unknown_Unknown_Unknown</td>"));
        assert!(html.contains("href=\"legal_leaderboard.json\""));
        assert!(html.contains("href=\"index.html\""));
    }
}
