use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;
mod ui;

#[derive(Parser)]
#[command(
    name = "sheetloc",
    version,
    about = "Sync i18next JSON locales with a shared translation sheet"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors to the console
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Two-way sync between the locales directory and the sheet
    Sync {
        /// Locales root with one directory per language
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Sheet range holding the table, header row first [default: Sheet1]
        #[arg(long)]
        range: Option<String>,
        /// Google Sheets document id
        #[arg(long)]
        spreadsheet_id: Option<String>,
        /// OAuth access token for the Sheets API
        #[arg(long, env = "SHEETLOC_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
        /// Use a CSV file as the sheet instead of Google Sheets
        #[arg(long, conflicts_with = "spreadsheet_id")]
        table_csv: Option<PathBuf>,
        /// Write non-ASCII whitespace and control characters as \uXXXX [default: true]
        #[arg(long, value_name = "BOOL")]
        escape_non_printable: Option<bool>,
        /// Rows per remote write call [default: 10000]
        #[arg(long)]
        page_size: Option<usize>,
        /// Reconcile and report without writing anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Dump JSON schemas of the report types
    Schema {
        #[arg(long, default_value = "")]
        out_dir: PathBuf,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        match self {
            Commands::Sync {
                path,
                range,
                spreadsheet_id,
                access_token,
                table_csv,
                escape_non_printable,
                page_size,
                dry_run,
                format,
            } => {
                info!(event = "command_start", cmd = "sync");
                let result = commands::sync::run_sync(commands::sync::SyncArgs {
                    path,
                    range,
                    spreadsheet_id,
                    access_token,
                    table_csv,
                    escape_non_printable,
                    page_size,
                    dry_run,
                    format,
                    use_color,
                });
                if result.is_err() {
                    crate::ui_err!("Sync failed");
                }
                result
            }
            Commands::Schema { out_dir } => {
                info!(event = "command_start", cmd = "schema");
                commands::schema::run_schema(out_dir)
            }
        }
    }
}

/// Console layer on stderr plus a daily rolling debug log under `logs/`.
/// The returned guard flushes the file writer when dropped.
fn init_tracing(quiet: bool) -> WorkerGuard {
    let file_appender = rolling::daily("logs", "sheetloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = init_tracing(cli.quiet);

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
