//! `pr-review`: run three AI reviewers over a unified diff.
//!
//! Reads a diff from a file or stdin, runs the security, performance and
//! maintainability reviewers concurrently, merges their findings, and writes
//! `review.json` and `review.md` into the output directory.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use uuid::Uuid;

use pr_review_core::{
    write_review_json, write_review_md, Issue, LlmConfig, MergeConfig, OpenAiBackend,
    Orchestrator, RetryPolicy, ReviewConfig, ReviewError, ReviewSet, SeverityCounts,
    REVIEW_JSON_FILE, REVIEW_MD_FILE,
};

#[derive(Parser, Debug)]
#[command(name = "pr-review")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-agent AI review of a unified diff", long_about = None)]
struct Cli {
    /// Path to the diff file, or `-` to read stdin
    #[arg(default_value = "-")]
    diff: String,

    /// Output directory for review.json and review.md
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// Print each reviewer's summary
    #[arg(long)]
    show_agents: bool,

    /// Also print the merged issues as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    log_json: bool,

    /// Chat model name
    #[arg(long, env = "PR_REVIEW_MODEL")]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// API key for the model backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Backend attempts per call before a reviewer gives up
    #[arg(long, default_value_t = pr_review_core::agent::retry::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Title similarity at or above which overlapping findings are merged
    #[arg(long, default_value_t = pr_review_core::merge::DEFAULT_SIMILARITY_THRESHOLD)]
    similarity_threshold: f64,
}

impl Cli {
    fn llm_config(&self) -> LlmConfig {
        let mut config = LlmConfig::from_env();
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.as_str());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.as_str());
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.as_str());
        }
        config
    }

    fn review_config(&self) -> ReviewConfig {
        ReviewConfig {
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                ..RetryPolicy::default()
            },
            merge: MergeConfig {
                similarity_threshold: self.similarity_threshold,
            },
        }
    }
}

/// Read the diff from `source` (`-` means stdin). A blank diff is an error.
///
/// Invalid UTF-8 (Latin-1 sources, mixed encodings) is replaced with U+FFFD
/// rather than rejected.
fn read_diff(source: &str) -> Result<String> {
    let bytes = if source == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("read diff from stdin")?;
        buf
    } else {
        std::fs::read(source).with_context(|| format!("read {:?}", source))?
    };
    let diff = String::from_utf8_lossy(&bytes).into_owned();
    if diff.trim().is_empty() {
        return Err(ReviewError::EmptyDiff.into());
    }
    Ok(diff)
}

/// Write both reports into `out_dir`, creating it if needed.
fn write_reports(out_dir: &Path, issues: &[Issue]) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;
    let json_path = out_dir.join(REVIEW_JSON_FILE);
    let md_path = out_dir.join(REVIEW_MD_FILE);
    write_review_json(&json_path, issues)?;
    write_review_md(&md_path, issues)?;
    Ok((json_path, md_path))
}

fn print_agents(reviews: &ReviewSet) {
    for (kind, review) in reviews.iter() {
        println!("\n[{}] {}", kind, review.summary);
    }
}

async fn run_reviewers(cli: &Cli, run_id: &str, diff: &str) -> Result<ReviewSet> {
    let backend = OpenAiBackend::new(cli.llm_config())?;
    let orchestrator = Orchestrator::new(Arc::new(backend), cli.review_config());
    Ok(orchestrator.run_with_id(run_id, diff).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    pr_review_core::init_tracing(cli.log_json, level);

    let diff = read_diff(&cli.diff).context("reading diff")?;

    let run_id = Uuid::new_v4().to_string();
    let reviews = run_reviewers(&cli, &run_id, &diff)
        .await
        .context("running reviewers")?;

    // No awaits past this point; the reviewers ran under the orchestrator's span.
    let _span = tracing::info_span!("pr_review.report", run_id = %run_id).entered();

    if cli.show_agents {
        print_agents(&reviews);
    }

    let merged = reviews.merged(&cli.review_config().merge);
    info!(
        raw_issues = reviews.issue_count(),
        merged_issues = merged.len(),
        "review complete"
    );

    let (json_path, md_path) = write_reports(&cli.out, &merged).context("writing report")?;
    println!("\nWrote: {}", json_path.display());
    println!("Wrote: {}", md_path.display());
    println!("Summary: {}", SeverityCounts::from_issues(&merged));

    if cli.json {
        let json = serde_json::to_string_pretty(&merged).context("serialize merged issues")?;
        println!("{}", json);
    }

    Ok(())
}
