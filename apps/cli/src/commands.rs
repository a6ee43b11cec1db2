//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bleacher_core::pipeline::{CycleOutput, ProgressReporter, Snapshot, run_cycle};
use bleacher_core::GeminiClient;
use bleacher_feeds::FeedClient;
use bleacher_render::{Document, render};
use bleacher_shared::{AppConfig, BleacherError, ReportMeta, init_config, load_config};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// File name used instead of the dated one on dry runs.
const PREVIEW_FILE_NAME: &str = "report_preview.html";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Bleacher — weekly team briefs from news, Reddit, and an LLM.
#[derive(Parser)]
#[command(
    name = "bleacher",
    version,
    about = "Build a weekly fan-intelligence brief for an NFL team.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
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
    /// Fetch sources, generate the report, and write the HTML brief.
    Run {
        /// Output directory (overrides `[output] dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write `report_preview.html` instead of a dated report.
        #[arg(long)]
        dry_run: bool,

        /// Display date for the header (defaults to today, e.g. "February 20, 2026").
        #[arg(long)]
        date: Option<String>,

        /// Also save the cycle as a JSON snapshot at this path.
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Re-render a saved snapshot without network access.
    Render {
        /// Snapshot written by `bleacher run --snapshot`.
        #[arg(long)]
        snapshot: PathBuf,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
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

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bleacher=info",
        1 => "bleacher=debug",
        _ => "bleacher=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            out,
            dry_run,
            date,
            snapshot,
        } => cmd_run(out, dry_run, date, snapshot.as_deref()).await,
        Command::Render { snapshot, out } => cmd_render(&snapshot, out.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(
    out: Option<PathBuf>,
    dry_run: bool,
    date: Option<String>,
    snapshot: Option<&Path>,
) -> Result<()> {
    let mut config = load_config()?;
    if let Some(dir) = out {
        config.output.dir = dir.display().to_string();
    }
    if dry_run {
        config.output.dry_run = true;
    }

    // Fail fast on a missing key, before any network traffic.
    let generator = Arc::new(GeminiClient::from_config(&config)?);
    let feeds = FeedClient::new()?;

    let today = Local::now().date_naive();
    let meta = ReportMeta {
        team_name: config.team.name.clone(),
        date: date.unwrap_or_else(|| display_date(today)),
    };

    info!(
        team = %meta.team_name,
        model = generator.model(),
        dry_run = config.output.dry_run,
        "starting report cycle"
    );

    let reporter = CliProgress::new();
    let output = run_cycle(
        &generator,
        &feeds,
        &config.team,
        &meta,
        Utc::now(),
        &reporter,
    )
    .await;

    if let Some(path) = snapshot {
        output.save(path)?;
    }

    let document = render(&output.report, &output.sources);
    let file_name = report_file_name(&config, today);
    let path = write_document(Path::new(&config.output.dir), &file_name, &document)?;

    print_summary(&output, &document, &path);
    Ok(())
}

fn cmd_render(snapshot: &Path, out: Option<&Path>) -> Result<()> {
    let output = Snapshot::load(snapshot)?;
    let document = render(&output.report, &output.sources);

    match out {
        Some(path) => {
            std::fs::write(path, &document.html).map_err(|e| BleacherError::io(path, e))?;
            info!(?path, subject = %document.subject, "rendered snapshot");
            println!("Rendered: {}", path.display());
        }
        None => print!("{}", document.html),
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// File sink
// ---------------------------------------------------------------------------

/// "February 20, 2026"
fn display_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

fn report_file_name(config: &AppConfig, today: NaiveDate) -> String {
    if config.output.dry_run {
        PREVIEW_FILE_NAME.to_string()
    } else {
        format!("bleacher-report-{}.html", today.format("%Y-%m-%d"))
    }
}

/// Write the document's HTML into `dir`, creating it if needed.
fn write_document(dir: &Path, file_name: &str, document: &Document) -> Result<PathBuf> {
    if file_name.is_empty() {
        return Err(eyre!("empty output file name"));
    }
    std::fs::create_dir_all(dir).map_err(|e| BleacherError::io(dir, e))?;

    let path = dir.join(file_name);
    std::fs::write(&path, &document.html).map_err(|e| BleacherError::io(&path, e))?;
    info!(?path, bytes = document.html.len(), "report written");
    Ok(path)
}

fn print_summary(output: &CycleOutput, document: &Document, path: &Path) {
    let report = &output.report;
    println!();
    println!("  {}", document.subject);
    println!(
        "  Sentiment: {} ({}/100)",
        report.sentiment_label, report.sentiment_score
    );
    println!("  Headlines: {}", output.sources.news.items.len());
    println!("  Hot takes: {}", report.community_takes.len());
    println!("  Written:   {}", path.display());
    println!();
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
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _output: &CycleOutput) {
        self.spinner.finish_and_clear();
    }
}
