use color_eyre::eyre::{eyre, WrapErr};
use owo_colors::OwoColorize;
use sheetloc_core::{ProcessStatEntry, SheetRange, SyncEvent, SyncEventKind};
use sheetloc_services::util::truncate_key;
use sheetloc_services::{GoogleSheetsTable, SheetWarning, SyncOptions, SyncOutcome, INSERT_PAGE_SIZE};
use sheetloc_table_api::SheetTable;
use sheetloc_table_csv::CsvTable;
use std::path::PathBuf;

const DEFAULT_RANGE: &str = "Sheet1";

pub struct SyncArgs {
    pub path: Option<PathBuf>,
    pub range: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub access_token: Option<String>,
    pub table_csv: Option<PathBuf>,
    pub escape_non_printable: Option<bool>,
    pub page_size: Option<usize>,
    pub dry_run: bool,
    pub format: String,
    pub use_color: bool,
}

pub fn run_sync(args: SyncArgs) -> color_eyre::Result<()> {
    tracing::debug!(
        event = "sync_args",
        path = ?args.path,
        range = ?args.range,
        table_csv = ?args.table_csv,
        dry_run = args.dry_run,
        format = %args.format
    );
    let cfg = sheetloc_config::load_config()?;
    let sync_cfg = cfg.sync.clone().unwrap_or_default();

    let range_text = args
        .range
        .or(cfg.range.clone())
        .unwrap_or_else(|| DEFAULT_RANGE.to_string());
    let range = SheetRange::parse(&range_text)?;

    let path = args
        .path
        .or_else(|| cfg.path.clone().map(PathBuf::from))
        .ok_or_else(|| eyre!("no locales path: pass --path or set `path` in sheetloc.toml"))?;

    let mut options = SyncOptions::new(path, range);
    options.escape_non_printable = args
        .escape_non_printable
        .or(sync_cfg.escape_non_printable)
        .unwrap_or(true);
    options.page_size = args
        .page_size
        .or(sync_cfg.page_size)
        .unwrap_or(INSERT_PAGE_SIZE);
    options.dry_run = args.dry_run || sync_cfg.dry_run.unwrap_or(false);

    let mut table: Box<dyn SheetTable> = match args.table_csv {
        Some(csv) => Box::new(CsvTable::open(&csv)?),
        None => {
            let id = args
                .spreadsheet_id
                .or(cfg.spreadsheet_id.clone())
                .ok_or_else(|| eyre!("no sheet: pass --spreadsheet-id or --table-csv"))?;
            let token = match args.access_token {
                Some(t) => t,
                None => token_from_config_env(cfg.access_token_env.as_deref())?,
            };
            Box::new(GoogleSheetsTable::new(id, token)?)
        }
    };

    let outcome = sheetloc_services::run_sync(table.as_mut(), &options)?;

    if args.format == "json" {
        let report = outcome.to_report(options.dry_run);
        serde_json::to_writer_pretty(std::io::stdout().lock(), &report)?;
        println!();
        return Ok(());
    }
    render_text(&outcome, options.dry_run, args.use_color);
    Ok(())
}

fn token_from_config_env(var: Option<&str>) -> color_eyre::Result<String> {
    let var = var.ok_or_else(|| {
        eyre!("no access token: pass --access-token, set SHEETLOC_ACCESS_TOKEN or `access_token_env`")
    })?;
    std::env::var(var).wrap_err_with(|| format!("read access token from ${var}"))
}

fn render_text(outcome: &SyncOutcome, dry_run: bool, use_color: bool) {
    for event in &outcome.stats.events {
        crate::ui_out!("{}", event_line(event, use_color));
    }
    for warning in &outcome.warnings {
        match warning {
            SheetWarning::DuplicateKey { key, row_id } => crate::ui_warn!(
                "duplicate key {} in data row {}; the later row wins",
                truncate_key(&key.to_string()),
                row_id
            ),
        }
    }

    let stats = &outcome.stats;
    if stats.is_unchanged() {
        crate::ui_out!("No changes detected");
    } else {
        crate::ui_out!("Sync complete!");
        crate::ui_out!("{}", summary_line("Added", &stats.added, SyncEventKind::Added, use_color));
        crate::ui_out!("{}", summary_line("Updated", &stats.updated, SyncEventKind::Updated, use_color));
        crate::ui_out!("{}", summary_line("Reused", &stats.reused, SyncEventKind::Reused, use_color));
        crate::ui_out!("{}", summary_line("Pruned", &stats.pruned, SyncEventKind::Pruned, use_color));
    }
    if dry_run {
        crate::ui_info!(
            "Dry run: {} rows would be updated and {} appended; no files written",
            outcome.writeback.rows_updated,
            outcome.writeback.rows_appended
        );
    } else if outcome.writeback.pages > 0 || outcome.files_written > 0 {
        crate::ui_info!(
            "{} rows updated, {} appended in {} calls; {} files written",
            outcome.writeback.rows_updated,
            outcome.writeback.rows_appended,
            outcome.writeback.pages,
            outcome.files_written
        );
    }
}

fn paint(text: &str, kind: SyncEventKind, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    match kind {
        SyncEventKind::Added => text.green().to_string(),
        SyncEventKind::Updated => text.blue().to_string(),
        SyncEventKind::Seeded => text.dimmed().to_string(),
        SyncEventKind::Reused => text.yellow().to_string(),
        SyncEventKind::Pruned => text.red().to_string(),
    }
}

fn event_line(event: &SyncEvent, use_color: bool) -> String {
    let label = match event.kind {
        SyncEventKind::Added => "+ creating",
        SyncEventKind::Updated => "~ updating",
        SyncEventKind::Seeded => "· seeding",
        SyncEventKind::Reused => "~ marking as used",
        SyncEventKind::Pruned => "- pruning",
    };
    let key = truncate_key(&event.key.to_string());
    match &event.lang {
        Some(lang) => format!("{} {key} {lang}", paint(label, event.kind, use_color)),
        None => format!("{} {key}", paint(label, event.kind, use_color)),
    }
}

fn summary_line(title: &str, entry: &ProcessStatEntry, kind: SyncEventKind, use_color: bool) -> String {
    let mut line = format!("{title}: {}", entry.count);
    if !entry.namespaces.is_empty() {
        let names: Vec<&str> = entry.namespaces.iter().map(String::as_str).collect();
        line.push_str(&format!(" ({})", names.join(", ")));
    }
    paint(&line, kind, use_color)
}
