//! CLI entry point for the experiment dashboard.
//!
//! Loads experiment records once from a URL or file and renders headline
//! metrics, a weekly chart and a paginated table, or emits the computed data
//! as JSON or CSV.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use experiment_dashboard::analyzers::weekly::{WeekSelection, aggregate_by_week};
use experiment_dashboard::{
    config::DashboardConfig,
    fetch::{BasicClient, fetch_observations, load_dataset},
    output::{daily_rows, print_json, render_dashboard, write_records},
    stats::DashboardSummary,
    table::{Column, Direction, SortKey, TableState},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "experiment_dashboard")]
#[command(about = "Summarize fuel and water production from experiment records", long_about = None)]
struct Cli {
    /// URL or file to read experiment records from (overrides DASHBOARD_SOURCE)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render metrics, the weekly chart and the observation table
    Show {
        /// Week to chart, by label (e.g. "Jan-07 - Jan-13")
        #[arg(long, conflicts_with = "week_index")]
        week: Option<String>,

        /// Week to chart, by position in the newest-first listing
        #[arg(long)]
        week_index: Option<usize>,

        /// Table column to sort by
        #[arg(long, value_enum, default_value_t = Column::Date)]
        sort: Column,

        /// Sort ascending instead of descending
        #[arg(long, default_value_t = false)]
        asc: bool,

        /// Table page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Rows per table page (overrides DASHBOARD_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Print headline metrics as JSON
    Summary,
    /// Print weekly summaries as JSON
    Weekly,
    /// Write observations or daily aggregates to a CSV file
    Export {
        /// CSV file to write
        #[arg(short, long)]
        output: String,

        /// What to export
        #[arg(short, long, value_enum, default_value_t = ExportKind::Observations)]
        kind: ExportKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Observations,
    Weekly,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/experiment_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("experiment_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env()?;
    if let Some(source) = cli.source {
        config.source = source;
    }
    let client = BasicClient::new(&config)?;
    info!(source = %config.source, "Loading experiment data");

    match cli.command {
        Commands::Show {
            week,
            week_index,
            sort,
            asc,
            page,
            page_size,
        } => {
            let selection = match (week, week_index) {
                (Some(label), _) => WeekSelection::Label(label),
                (None, Some(index)) => WeekSelection::Index(index),
                (None, None) => WeekSelection::Latest,
            };
            let table = TableState {
                sort: SortKey {
                    column: sort,
                    direction: if asc {
                        Direction::Ascending
                    } else {
                        Direction::Descending
                    },
                },
                page_index: page.saturating_sub(1),
                page_size: page_size.unwrap_or(config.page_size),
            };

            let state = load_dataset(&client, &config.source).await;
            print!("{}", render_dashboard(&state, &selection, &table)?);
        }
        Commands::Summary => {
            let batch = fetch_observations(&client, &config.source).await?;
            print_json(&DashboardSummary::from_observations(&batch.observations))?;
        }
        Commands::Weekly => {
            let batch = fetch_observations(&client, &config.source).await?;
            print_json(&aggregate_by_week(&batch.observations))?;
        }
        Commands::Export { output, kind } => {
            let batch = fetch_observations(&client, &config.source).await?;
            match kind {
                ExportKind::Observations => write_records(&output, &batch.observations)?,
                ExportKind::Weekly => {
                    let weeks = aggregate_by_week(&batch.observations);
                    write_records(&output, &daily_rows(&weeks))?;
                }
            }
            info!(output = %output, "CSV export written");
        }
    }

    Ok(())
}
