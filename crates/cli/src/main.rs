//! Uplink CLI
//!
//! Terminal front end for the indexing pipeline.
//!
//! ## Commands
//!
//! - `index` - Run one indexing pass and print the report
//! - `search` - Re-index, then ask the backend a question
//! - `projects` - List locally recorded projects (no network)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use uplink_backend::{BatchUploader, HttpBackend};
use uplink_indexer::{IndexReport, IndexStatus, JsonFileStore, ProjectIndexStore, ProjectIndexer};
use uplink_search::SearchDelegate;

mod config;

use config::UplinkConfig;

#[derive(Parser)]
#[command(name = "uplink")]
#[command(version)]
#[command(about = "Incremental code indexing and semantic search", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to the per-user location)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a project directory
    Index {
        /// Project root to index
        #[arg(default_value = ".")]
        path: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Index a project, then ask the backend a question about it
    Search {
        /// Project root to search
        path: String,

        /// The question, in natural language
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List locally recorded projects
    Projects,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // Keep stdout clean for command output; logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = UplinkConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Index { path, json } => index(&config, &path, json).await,
        Command::Search { path, query } => search(&config, &path, &query).await,
        Command::Projects => projects(&config).await,
    }
}

async fn index(config: &UplinkConfig, path: &str, json: bool) -> Result<()> {
    let (indexer, _, _) = build_pipeline(config)?;
    let report = indexer.index_project(&absolutize(path)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

async fn search(config: &UplinkConfig, path: &str, terms: &[String]) -> Result<()> {
    let text = terms.join(" ");
    if text.trim().is_empty() {
        bail!("empty query");
    }

    let (indexer, store, backend) = build_pipeline(config)?;
    let delegate = SearchDelegate::new(indexer, store, backend);
    let answer = delegate.query(&absolutize(path)?, &text).await?;
    println!("{answer}");
    Ok(())
}

async fn projects(config: &UplinkConfig) -> Result<()> {
    let store = JsonFileStore::new(config.store_path()?);
    let index = store.load().await?;

    if index.is_empty() {
        println!("No projects indexed yet.");
        return Ok(());
    }
    for (project, blobs) in &index {
        println!("{project}  ({} blobs)", blobs.len());
    }
    Ok(())
}

fn build_pipeline(
    config: &UplinkConfig,
) -> Result<(ProjectIndexer, Arc<dyn ProjectIndexStore>, Arc<HttpBackend>)> {
    let backend = Arc::new(HttpBackend::new(&config.backend_config()?)?);
    let store: Arc<dyn ProjectIndexStore> = Arc::new(JsonFileStore::new(config.store_path()?));
    let uploader = BatchUploader::new(backend.clone(), config.batch_size, config.retry_policy());
    let indexer = ProjectIndexer::new(config.indexer_config(), store.clone(), uploader);
    Ok((indexer, store, backend))
}

/// Keep absolute spellings untouched (including the remote-filesystem forms
/// only the normalizer understands); anchor relative ones to the current
/// directory.
fn absolutize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let looks_absolute = trimmed.starts_with('/')
        || trimmed.starts_with('\\')
        || trimmed.as_bytes().get(1) == Some(&b':');
    if looks_absolute {
        return Ok(trimmed.to_string());
    }
    let joined = std::env::current_dir()
        .context("could not determine the current directory")?
        .join(trimmed);
    Ok(joined.display().to_string())
}

fn print_report(report: &IndexReport) {
    let status = match report.status {
        IndexStatus::Success => "success",
        IndexStatus::PartialSuccess => "partial success",
    };
    println!("Project: {}", report.project);
    println!("Status: {status}");
    println!(
        "Blobs: {} total, {} already indexed, {} uploaded",
        report.total_blobs, report.already_present, report.uploaded
    );
    if !report.failed_batches.is_empty() {
        println!(
            "Failed batches (retried on the next run): {:?}",
            report.failed_batches
        );
    }
    println!("Took {} ms", report.duration_ms);
}
