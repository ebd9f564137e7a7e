//! jobsearch - search job listings and upload new ones from the terminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobsearch_ui::{
    config::Config,
    ingest::{self, ExcelUpload, IngestBackend, IngestClient, JsonUpload, UploadPanel, UploadState},
    logging::{self, LogTarget},
    search::{self, parse_n_results, SearchBackend, SearchClient, SearchController},
    status::StatusLine,
    tui,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "jobsearch", version)]
#[command(about = "Search job listings and upload new ones")]
#[command(after_help = "\
EXAMPLES:
  jobsearch                              # Interactive terminal UI
  jobsearch search \"nurse leeds\" -n 3    # One-off search
  jobsearch upload-json listings.json    # Validate and upload a JSON array
  jobsearch health                       # Check both services")]
struct Cli {
    /// Search service base URL (overrides SEARCH_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    search_url: Option<String>,

    /// Ingest service base URL (overrides INGEST_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    ingest_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui,
    /// Run one search and print the results
    Search {
        /// Free-text query
        query: String,
        /// Number of results to request (0 lets the service decide)
        #[arg(short = 'n', long, value_name = "N")]
        n_results: Option<String>,
        /// Ask the service for an AI-generated answer (default: DEFAULT_USE_AI)
        #[arg(long, overrides_with = "no_ai")]
        ai: bool,
        /// Plain retrieval even when DEFAULT_USE_AI is set
        #[arg(long, overrides_with = "ai")]
        no_ai: bool,
    },
    /// Validate a JSON array of listings and upload the valid ones
    UploadJson {
        file: PathBuf,
    },
    /// Upload a spreadsheet (.xlsx, .xls, .xlsm, .csv)
    UploadExcel {
        file: PathBuf,
    },
    /// Check both services
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.search_url, cli.ingest_url);

    let command = cli.command.unwrap_or(Commands::Tui);
    let target = match command {
        Commands::Tui => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _guard = logging::init(&config.logging, target);

    match command {
        Commands::Tui => {
            tui::run(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Search {
            query,
            n_results,
            ai,
            no_ai,
        } => {
            let use_ai = use_ai_flag(ai, no_ai, config.ui.default_use_ai);
            cmd_search(&config, &query, n_results, use_ai).await
        }
        Commands::UploadJson { file } => cmd_upload_json(&config, &file).await,
        Commands::UploadExcel { file } => cmd_upload_excel(&config, &file).await,
        Commands::Health => cmd_health(&config).await,
    }
}

/// `--ai` / `--no-ai` win over the configured default; the last one given wins
fn use_ai_flag(ai: bool, no_ai: bool, default: bool) -> bool {
    match (ai, no_ai) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

/// Print a status line, to stderr when it reports a failure
fn report(status: &StatusLine) -> ExitCode {
    if status.is_error() {
        eprintln!("{}", status.text);
        ExitCode::FAILURE
    } else {
        println!("{}", status.text);
        ExitCode::SUCCESS
    }
}

async fn cmd_search(config: &Config, query: &str, n_results: Option<String>, use_ai: bool) -> Result<ExitCode> {
    let n_results = match n_results {
        Some(raw) => parse_n_results(&raw),
        None => config.ui.default_n_results,
    };

    let mut controller = SearchController::new();
    let ticket = match controller.begin(query, n_results, use_ai) {
        Ok(ticket) => ticket,
        Err(e) => return Ok(report(&StatusLine::from(&e))),
    };

    let client = SearchClient::new(&config.search)?;
    let view = search::execute(&client, &ticket).await;
    for card in &view.cards {
        println!("{}", card);
    }
    Ok(report(&view.status))
}

async fn cmd_upload_json(config: &Config, file: &Path) -> Result<ExitCode> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Cannot read {}", file.display()))?;

    let mut panel = JsonUpload::new();
    if let Some(status) = panel.validate(&text).status_line() {
        if status.is_error() {
            return Ok(report(&status));
        }
        println!("{}", status.text);
    }

    let client = IngestClient::new(&config.ingest)?;
    Ok(upload(&mut panel, &client).await)
}

async fn cmd_upload_excel(config: &Config, file: &Path) -> Result<ExitCode> {
    let mut panel = ExcelUpload::new();
    panel.select(file.display().to_string());

    let client = IngestClient::new(&config.ingest)?;
    Ok(upload(&mut panel, &client).await)
}

/// Drive one panel through submission and report the end state
async fn upload<P, B>(panel: &mut P, backend: &B) -> ExitCode
where
    P: UploadPanel,
    B: IngestBackend,
{
    match panel.prepare_submit() {
        Ok(payload) => {
            let result = ingest::submit(backend, payload).await;
            panel.finish(&result);
        }
        Err(e) => return report(&StatusLine::from(&e)),
    }

    info!(succeeded = matches!(panel.state(), UploadState::Succeeded(_)), "upload done");
    match panel.state().status_line() {
        Some(status) => report(&status),
        None => ExitCode::SUCCESS,
    }
}

async fn cmd_health(config: &Config) -> Result<ExitCode> {
    let search = SearchClient::new(&config.search)?;
    let ingest = IngestClient::new(&config.ingest)?;
    let (search_health, ingest_health) = tokio::join!(
        SearchBackend::health(&search),
        IngestBackend::health(&ingest)
    );

    println!("search  {}  {}", search.base_url(), search_health.describe());
    println!("ingest  {}  {}", ingest.base_url(), ingest_health.describe());

    if search_health.is_healthy() && ingest_health.is_healthy() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
