//! CLI entry point for the telemetry score merger.
//!
//! Provides subcommands for running the whole annotate → merge → join
//! pipeline, or any single stage on its own.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use telemetry_scorer::annotate::add_score_column;
use telemetry_scorer::config::PipelineConfig;
use telemetry_scorer::join::join_with_positions;
use telemetry_scorer::merge::merge_score_files;
use telemetry_scorer::pipeline;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "telemetry_scorer")]
#[command(about = "Merges scored telemetry datasets and joins them with GPS data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole annotate, merge, and join pipeline
    Run {
        /// JSON config file; omit to use the built-in dataset map
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Annotate one dataset with a constant score
    Annotate {
        /// Source CSV containing a "Time (s)" column
        source: PathBuf,

        /// Score assigned to every record
        #[arg(short, long)]
        score: f64,

        /// Destination CSV (overwritten if present)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Merge annotated datasets, filter by minimum score, sort descending
    Merge {
        /// Annotated CSV files, in merge order
        inputs: Vec<PathBuf>,

        /// Destination CSV (overwritten if present)
        #[arg(short, long)]
        output: PathBuf,

        /// Keep only records whose summed score reaches this value
        #[arg(short, long, default_value_t = 9.0)]
        min_score: f64,
    },
    /// Inner-join a merged dataset with positional data
    Join {
        /// Merged score CSV
        merged: PathBuf,

        /// Positional (GPS) CSV keyed by the same column
        positions: PathBuf,

        /// Destination CSV (overwritten if present)
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/telemetry_scorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("telemetry_scorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = match config {
                Some(path) => PipelineConfig::load(&path)?,
                None => PipelineConfig::default(),
            };

            info!(
                sources = config.sources.len(),
                min_score = config.min_score,
                "Starting pipeline"
            );
            let report = pipeline::run(&config)?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Annotate {
            source,
            score,
            output,
        } => {
            let rows = add_score_column(&source, score, &output)?;
            println!("Updated file saved as: {} ({} rows)", output.display(), rows);
        }
        Commands::Merge {
            inputs,
            output,
            min_score,
        } => {
            let rows = merge_score_files(&inputs, min_score, &output)?;
            println!(
                "Final merged file saved as: {} ({} rows)",
                output.display(),
                rows
            );
        }
        Commands::Join {
            merged,
            positions,
            output,
        } => {
            let matched = join_with_positions(&merged, &positions, &output)?;
            println!(
                "Merged file saved as '{}' with {} matching records.",
                output.display(),
                matched
            );
        }
    }

    Ok(())
}
