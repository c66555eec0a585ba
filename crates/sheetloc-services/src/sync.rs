use crate::file_io::{load_file_locale, save_file_locale, SaveOptions};
use crate::sheet_io::{load_sheet_locale, SheetWarning};
use crate::writeback::{apply_writeback, plan_writeback, WritebackStats, INSERT_PAGE_SIZE};
use color_eyre::eyre::WrapErr;
use sheetloc_core::{ProcessStatEntry, ProcessStats, Result, SheetRange};
use sheetloc_domain::{StatSummary, SyncEventRecord, SyncReport, SyncWarning, SCHEMA_VERSION};
use sheetloc_reconcile::{prune_sheet_locale, visit_locale};
use sheetloc_table_api::SheetTable;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Locales root holding one directory per language.
    pub locales_path: PathBuf,
    pub range: SheetRange,
    pub escape_non_printable: bool,
    pub page_size: usize,
    /// Reconcile and report without writing files or the table.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new(locales_path: impl Into<PathBuf>, range: SheetRange) -> Self {
        Self {
            locales_path: locales_path.into(),
            range,
            escape_non_printable: true,
            page_size: INSERT_PAGE_SIZE,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub stats: ProcessStats,
    pub warnings: Vec<SheetWarning>,
    pub files_written: usize,
    /// Rows sent to the table. On a dry run: rows that would be sent, with
    /// no pages issued.
    pub writeback: WritebackStats,
}

impl SyncOutcome {
    pub fn to_report(&self, dry_run: bool) -> SyncReport {
        SyncReport {
            schema_version: SCHEMA_VERSION,
            dry_run,
            added: summary(&self.stats.added),
            updated: summary(&self.stats.updated),
            reused: summary(&self.stats.reused),
            pruned: summary(&self.stats.pruned),
            rows_updated: self.writeback.rows_updated,
            rows_appended: self.writeback.rows_appended,
            pages: self.writeback.pages,
            files_written: self.files_written,
            events: self
                .stats
                .events
                .iter()
                .map(|e| SyncEventRecord {
                    schema_version: SCHEMA_VERSION,
                    kind: e.kind.as_str().to_string(),
                    namespace: e.key.namespace.clone(),
                    key: e.key.flat_key(),
                    lang: e.lang.clone(),
                })
                .collect(),
            warnings: self
                .warnings
                .iter()
                .map(|w| match w {
                    SheetWarning::DuplicateKey { key, row_id } => SyncWarning {
                        kind: "duplicate-key".to_string(),
                        key: key.to_string(),
                        row: Some(*row_id),
                    },
                })
                .collect(),
        }
    }
}

fn summary(entry: &ProcessStatEntry) -> StatSummary {
    StatSummary {
        count: entry.count,
        namespaces: entry.namespaces.iter().cloned().collect(),
    }
}

/// One full reconciliation run between the locales directory and `table`.
///
/// Stages run strictly in order; any error aborts the run. Pages already
/// applied to the table before a failure stay applied.
pub fn run_sync(table: &mut dyn SheetTable, options: &SyncOptions) -> Result<SyncOutcome> {
    tracing::info!(
        event = "sync_start",
        path = %options.locales_path.display(),
        table = table.name(),
        range = %options.range,
        dry_run = options.dry_run
    );
    let mut file_locale = load_file_locale(&options.locales_path)
        .wrap_err_with(|| format!("load locales from {}", options.locales_path.display()))?;
    let load = load_sheet_locale(table, &options.range)?;
    let columns = load.columns;
    let mut sheet = load.locale;

    let mut stats = ProcessStats::new();
    sheet.begin_run();
    visit_locale(&mut file_locale, &mut sheet, &mut stats);
    prune_sheet_locale(&mut sheet, &mut stats);

    let files_written = if options.dry_run {
        0
    } else {
        save_file_locale(
            &options.locales_path,
            &file_locale,
            SaveOptions {
                escape_non_printable: options.escape_non_printable,
            },
        )?
    };

    let plan = plan_writeback(&sheet, &columns, &options.range);
    let writeback = if options.dry_run {
        WritebackStats {
            rows_updated: plan.updates.len(),
            rows_appended: plan.appends.len(),
            pages: 0,
        }
    } else {
        apply_writeback(table, &plan, &options.range, options.page_size)?
    };

    tracing::info!(
        event = "sync_done",
        added = stats.added.count,
        updated = stats.updated.count,
        reused = stats.reused.count,
        pruned = stats.pruned.count,
        files_written,
        rows_updated = writeback.rows_updated,
        rows_appended = writeback.rows_appended,
        pages = writeback.pages
    );
    Ok(SyncOutcome {
        stats,
        warnings: load.warnings,
        files_written,
        writeback,
    })
}
