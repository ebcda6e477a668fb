//! # docsift CLI Application
//!
//! This module implements the command-line interface for docsift, providing
//! access to record extraction through a set of subcommands.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `extract`: Records of a single page
//!   - `scan`: Records of every page in a manifest, using a worker pool
//!   - `worker`: The worker protocol over stdin/stdout
//!
//! Records are written to stdout (or a file) as JSON; logs go to stderr and,
//! with `--log-dir`, to a log file.

mod telemetry;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use docsift::extractor::{Extractor, ExtractorConfig, VersionTable};
use docsift::worker::{PoolConfig, Task, TaskReport, Worker, WorkerPool};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, instrument};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract full-text search records from rendered documentation pages",
    long_about = None
)]
struct Cli {
    /// Also write logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the records of a single page
    Extract(ExtractArgs),

    /// Extract records for every page listed in a manifest
    Scan(ScanArgs),

    /// Serve the worker protocol on stdin/stdout
    Worker(WorkerArgs),
}

#[derive(Args, Debug)]
struct SelectorArgs {
    /// CSS selector of the markdown body
    #[arg(long, default_value = ".markdown")]
    markdown_selector: String,

    /// Section heading tags (comma-separated)
    #[arg(long, default_value = "h2,h3")]
    headings: String,

    /// Version table (JSON object of version id to display value)
    #[arg(long)]
    versions: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Rendered HTML file
    #[arg(required = true)]
    file: PathBuf,

    /// URL the page is served under
    #[arg(short, long)]
    url: String,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    #[command(flatten)]
    selectors: SelectorArgs,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// JSON array of {"path", "url"} tasks
    #[arg(required = true)]
    manifest: PathBuf,

    /// Number of workers (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write records to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    selectors: SelectorArgs,
}

#[derive(Args, Debug)]
struct WorkerArgs {
    #[command(flatten)]
    selectors: SelectorArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let _log_guard = telemetry::init_tracing_subscriber(cli.log_dir.as_deref())?;

    match cli.command {
        Some(Commands::Extract(args)) => {
            extract_command(args).await?;
        }
        Some(Commands::Scan(args)) => {
            scan_command(args).await?;
        }
        Some(Commands::Worker(args)) => {
            worker_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["docsift", "--help"]);
        }
    }

    Ok(())
}

impl SelectorArgs {
    fn extractor(&self) -> anyhow::Result<Arc<Extractor>> {
        let config = ExtractorConfig::builder()
            .markdown_selector(self.markdown_selector.clone())
            .heading_tags(
                self.headings
                    .split(',')
                    .map(|tag| tag.trim().to_ascii_lowercase())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
            )
            .build();
        Ok(Arc::new(Extractor::new(config)?))
    }

    async fn versions(&self) -> anyhow::Result<Option<Arc<VersionTable>>> {
        match &self.versions {
            Some(path) => Ok(Some(Arc::new(VersionTable::from_json_file(path).await?))),
            None => Ok(None),
        }
    }
}

#[instrument]
async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let extractor = args.selectors.extractor()?;
    let versions = args.selectors.versions().await?;

    // pages are decoded lossily, like the worker does
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("unable to read {}", args.file.display()))?;
    let document = Html::parse_document(&String::from_utf8_lossy(&bytes));
    let records: Vec<_> = extractor
        .extract(&document, &args.url, versions.as_deref())
        .collect();

    info!("Extracted {} records", records.len());
    let json = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{}", json);

    Ok(())
}

#[instrument]
async fn scan_command(args: ScanArgs) -> anyhow::Result<()> {
    let extractor = args.selectors.extractor()?;
    let versions = args.selectors.versions().await?;
    let tasks = load_manifest(&args.manifest).await?;

    let mut pool_config = PoolConfig::default();
    if let Some(workers) = args.workers {
        pool_config.workers = workers;
    }
    let pool = WorkerPool::new(extractor, versions, pool_config);

    // Create progress bar
    let progress_bar = ProgressBar::new(tasks.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );

    // Spawn a task to process progress updates
    let (progress_sender, mut progress_receiver) = mpsc::channel::<TaskReport>(100);
    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(report) = progress_receiver.recv().await {
                progress_bar.inc(1);
                progress_bar.set_message(report.url);
            }
            progress_bar.finish_and_clear();
        }
    });

    let start_time = std::time::Instant::now();
    let output = pool.run(tasks, Some(progress_sender)).await?;
    let _ = progress_handle.await;

    let json = serde_json::to_string(&output.records)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            eprintln!("Saved records to {}", path.display());
        }
        None => println!("{}", json),
    }

    eprintln!(
        "Indexed {} of {} pages ({} records) in {:.2?}",
        output.summary.indexed,
        output.summary.tasks,
        output.summary.records,
        start_time.elapsed()
    );

    Ok(())
}

#[instrument]
async fn worker_command(args: WorkerArgs) -> anyhow::Result<()> {
    let worker = Worker::new(
        args.selectors.extractor()?,
        args.selectors.versions().await?,
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let handled = docsift::worker::serve_stdio(&worker, stdin, tokio::io::stdout()).await?;
    info!("Worker exiting after {} tasks", handled);

    Ok(())
}

/// Load a manifest of tasks from a JSON array file
async fn load_manifest(path: &Path) -> anyhow::Result<Vec<Task>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("unable to read manifest {}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&content)
        .with_context(|| format!("invalid manifest {}", path.display()))?;
    info!("Loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}
