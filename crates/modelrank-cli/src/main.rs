//! ModelRank - LLM leaderboard reports
//!
//! The `modelrank` command fetches the open leaderboard dataset and renders
//! overall and domain-weighted leaderboards.
//!
//! ## Commands
//!
//! - `report`: full run, writes JSON and Markdown artifacts
//! - `score`: print one domain leaderboard
//! - `domains`: list configured domains and their weights

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

use modelrank_core::{
    build_report, domain_artifact, render_domain_md, run_report, update_readme, write_report,
    DomainOutcome, RecordSource, ReportConfig, ReportSummary, ScoringError,
};
use modelrank_hub::{HubClient, JsonFileSource};

#[derive(Parser)]
#[command(name = "modelrank")]
#[command(author = "ModelRank Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Open LLM leaderboard reports with domain-weighted rankings", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Report configuration (TOML); built-in tables when omitted
    #[arg(long, global = true, env = "MODELRANK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch rows, rank them and write all report artifacts
    Report {
        /// Read rows from a JSON dump instead of the hub
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for JSON and Markdown artifacts
        #[arg(short, long, default_value = "docs")]
        out_dir: PathBuf,

        /// README to patch with the leaderboard sections
        #[arg(long)]
        readme: Option<PathBuf>,
    },

    /// Print one domain leaderboard as Markdown
    Score {
        /// Domain key, e.g. `legal`
        domain: String,

        /// Read rows from a JSON dump instead of the hub
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Maximum rows to print (default: configured domain limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List configured domains and their metric weights
    Domains,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    modelrank_core::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Report {
            input,
            out_dir,
            readme,
        } => {
            let source = open_source(input.as_deref())?;
            let summary = cmd_report(source.as_ref(), &config, &out_dir, readme.as_deref()).await?;
            print!("{}", render_summary(&summary));
            Ok(())
        }
        Commands::Score {
            domain,
            input,
            limit,
        } => {
            let source = open_source(input.as_deref())?;
            let table = cmd_score(source.as_ref(), &config, &domain, limit).await?;
            print!("{}", table);
            Ok(())
        }
        Commands::Domains => {
            print!("{}", cmd_domains(&config));
            Ok(())
        }
    }
}

/// Load the report configuration, or the built-in tables.
fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => ReportConfig::from_path(path)
            .with_context(|| format!("Failed to load config {:?}", path)),
        None => Ok(ReportConfig::default()),
    }
}

/// A dump file when given, the hub otherwise.
fn open_source(input: Option<&Path>) -> Result<Box<dyn RecordSource>> {
    match input {
        Some(path) => Ok(Box::new(JsonFileSource::new(path))),
        None => {
            let client = HubClient::from_env().context("Failed to create hub client")?;
            Ok(Box::new(client))
        }
    }
}

/// Full report run. Only a failed fetch or an unwritable output directory is
/// an error; unscorable domains are listed in the summary.
async fn cmd_report(
    source: &dyn RecordSource,
    config: &ReportConfig,
    out_dir: &Path,
    readme: Option<&Path>,
) -> Result<ReportSummary> {
    let report = run_report(source, config)
        .await
        .with_context(|| format!("Failed to fetch rows from {}", source.describe()))?;

    let written = write_report(out_dir, &report, config)?;
    for path in &written.paths {
        info!(path = %path.display(), "artifact written");
    }

    if let Some(readme) = readme {
        if let Err(err) = update_readme(readme, &report, config) {
            warn!(path = %readme.display(), error = %format!("{err:#}"), "README not updated");
        }
    }

    Ok(report.summary())
}

/// Score one domain and render it as Markdown.
async fn cmd_score(
    source: &dyn RecordSource,
    config: &ReportConfig,
    domain: &str,
    limit: Option<usize>,
) -> Result<String> {
    let Some(domain_config) = config.domain(domain) else {
        return Err(ScoringError::UnknownDomain {
            domain: domain.to_string(),
        })
        .with_context(|| format!("Known domains: {}", config.domain_keys().join(", ")));
    };

    let rows = source
        .fetch_raw_records()
        .await
        .with_context(|| format!("Failed to fetch rows from {}", source.describe()))?;

    let scoped = ReportConfig {
        domains: vec![domain_config.clone()],
        ..config.clone()
    };
    let report = build_report(&rows, &scoped);

    match report.domain(domain) {
        Some(DomainOutcome::Scored(board)) => {
            let artifact = domain_artifact(&report, board, domain_config);
            Ok(render_domain_md(
                &artifact,
                limit.unwrap_or(config.domain_limit),
            ))
        }
        Some(DomainOutcome::Failed { error, .. }) => Err(error.clone().into()),
        None => bail!("domain {} was not scored", domain),
    }
}

/// List domains with their weights.
fn cmd_domains(config: &ReportConfig) -> String {
    let mut out = String::new();
    for domain in &config.domains {
        let weights: Vec<String> = domain
            .weights
            .iter()
            .map(|w| format!("{} {:.2}", w.metric.label(), w.weight))
            .collect();
        let title = if domain.icon.is_empty() {
            domain.display_name.clone()
        } else {
            format!("{} {}", domain.icon, domain.display_name)
        };
        out.push_str(&format!(
            "{:<10} {:<16} {}\n",
            domain.key,
            title,
            weights.join(", ")
        ));
    }
    out
}

fn render_summary(summary: &ReportSummary) -> String {
    let mut out = format!(
        "Run {}: {} rows, {} normalized, {} rejected\n",
        summary.run_id, summary.total_rows, summary.normalized, summary.rejected
    );
    if !summary.duplicate_ids.is_empty() {
        out.push_str(&format!(
            "Duplicate ids: {}\n",
            summary.duplicate_ids.join(", ")
        ));
    }
    for domain in &summary.domains {
        match &domain.error {
            None => out.push_str(&format!(
                "  {:<10} {} entries\n",
                domain.domain, domain.entries
            )),
            Some(error) => out.push_str(&format!("  {:<10} FAILED: {}\n", domain.domain, error)),
        }
    }
    out
}
