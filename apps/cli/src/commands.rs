//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use handelsregister_core::pipeline::{ProgressReporter, SearchOutcome};
use handelsregister_core::{LocalSource, ResultCache, render};
use handelsregister_shared::{
    AppConfig, CompanyRecord, SearchConfig, SearchOption, init_config, load_config,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Separator printed between text records.
const RECORD_RULE: &str = "----------------------------------------";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Handelsregister — query the German commercial register.
#[derive(Parser)]
#[command(
    name = "handelsregister",
    version,
    about = "Search the German commercial register and extract company data.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Search for companies by name.
    Search {
        /// Search term (company name or keywords).
        term: String,

        /// Keyword matching: all, min, or exact (defaults to config).
        #[arg(short = 'o', long)]
        option: Option<SearchOption>,

        /// Ignore cached results and fetch a fresh page.
        #[arg(short, long)]
        force: bool,

        /// Retrieve one document per company and extract its fields.
        #[arg(short, long)]
        documents: bool,

        /// Print JSON instead of text blocks.
        #[arg(long)]
        json: bool,

        /// Directory of saved result pages.
        #[arg(long)]
        pages_dir: Option<PathBuf>,

        /// Directory of downloaded documents.
        #[arg(long)]
        documents_dir: Option<PathBuf>,

        /// Result cache directory.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Parse a saved result page.
    Parse {
        /// HTML file to parse.
        file: PathBuf,

        /// Print JSON instead of text blocks.
        #[arg(long)]
        json: bool,
    },

    /// Extract fields from a document (.txt or .pdf).
    Extract {
        /// Document file.
        file: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "handelsregister=info",
        1 => "handelsregister=debug",
        _ => "handelsregister=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Search {
            term,
            option,
            force,
            documents,
            json,
            pages_dir,
            documents_dir,
            cache_dir,
        } => {
            let config = load_config()?;
            let mut search = SearchConfig::from(&config);
            if let Some(option) = option {
                search.option = option;
            }
            search.force = force;
            search.fetch_documents = documents;
            if let Some(dir) = pages_dir {
                search.pages_dir = dir;
            }
            if let Some(dir) = documents_dir {
                search.documents_dir = dir;
            }
            if let Some(dir) = cache_dir {
                search.cache_dir = dir;
            }
            cmd_search(&term, &search, json || documents).await
        }
        Command::Parse { file, json } => cmd_parse(&file, json).await,
        Command::Extract { file } => cmd_extract(&file).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_search(term: &str, config: &SearchConfig, json: bool) -> Result<()> {
    info!(
        term,
        option = %config.option,
        force = config.force,
        documents = config.fetch_documents,
        "searching register"
    );

    let source = LocalSource::from_config(config);
    let cache = ResultCache::new(&config.cache_dir);
    let reporter = CliProgress::new();

    let outcome = handelsregister_core::search(&source, &cache, term, config, &reporter).await;
    reporter.spinner.finish_and_clear();
    let outcome = outcome?;

    info!(
        companies = outcome.records.len(),
        from_cache = outcome.from_cache,
        documents = outcome.documents_extracted,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "search finished"
    );

    print_records(&outcome.records, json)
}

async fn cmd_parse(file: &Path, json: bool) -> Result<()> {
    let markup = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| eyre!("cannot read '{}': {e}", file.display()))?;
    let records = handelsregister_results::parse(&markup);
    print_records(&records, json)
}

async fn cmd_extract(file: &Path) -> Result<()> {
    let text = match file.extension().and_then(|e| e.to_str()) {
        Some("pdf") => handelsregister_core::pdf_text(file).await?,
        Some("txt") => tokio::fs::read_to_string(file)
            .await
            .map_err(|e| eyre!("cannot read '{}': {e}", file.display()))?,
        _ => {
            return Err(eyre!(
                "unsupported document '{}': expected a .txt or .pdf file",
                file.display()
            ));
        }
    };

    let fields = handelsregister_extract::extract(&text);
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

fn print_records(records: &[CompanyRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", render::json(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No companies found");
        return Ok(());
    }

    for record in records {
        print!("{}", render::text(record)?);
        println!("{RECORD_RULE}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn company_processed(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Documents [{current}/{total}] {name}"));
    }

    fn done(&self, _outcome: &SearchOutcome) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
