//! Turn changed sheet entries into range updates and appended rows, then
//! send them in pages.

use crate::sheet_io::SheetColumns;
use color_eyre::eyre::WrapErr;
use sheetloc_core::{Result, SheetEntry, SheetLocale, SheetRange};
use sheetloc_table_api::{RangeWrite, SheetTable};
use std::borrow::Cow;

/// Largest number of rows sent in one remote call.
pub const INSERT_PAGE_SIZE: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritebackPlan {
    /// One full-width write per changed row that already exists remotely.
    pub updates: Vec<RangeWrite>,
    /// Changed rows without a remote position, in catalog order.
    pub appends: Vec<Vec<String>>,
}

impl WritebackPlan {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.appends.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritebackStats {
    pub rows_updated: usize,
    pub rows_appended: usize,
    /// Remote calls issued.
    pub pages: usize,
}

/// Prefix values the sheet would otherwise read as a formula or strip a
/// leading quote from.
pub fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.starts_with(['=', '+', '\'']) {
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    }
}

// Unnamed columns carry the raw cell read from the sheet. They are escaped
// too, since a formula-looking raw value would be evaluated on a
// USER_ENTERED write.
fn render_row(entry: &SheetEntry, columns: &SheetColumns) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| escape_cell(entry.cell(name.as_deref(), i)).into_owned())
        .collect()
}

/// Partition changed entries into updates and appends. Unchanged entries
/// produce nothing.
pub fn plan_writeback(sheet: &SheetLocale, columns: &SheetColumns, range: &SheetRange) -> WritebackPlan {
    let mut plan = WritebackPlan::default();
    for entry in sheet.iter().filter(|e| e.has_changed) {
        let row = render_row(entry, columns);
        match entry.row_id {
            Some(row_id) => plan.updates.push(RangeWrite {
                range: range.row_range(row_id, columns.len()),
                rows: vec![row],
            }),
            None => plan.appends.push(row),
        }
    }
    tracing::debug!(
        event = "writeback_plan",
        updates = plan.updates.len(),
        appends = plan.appends.len()
    );
    plan
}

/// Send the plan in pages of at most `page_size` rows. Pages go out one
/// after another; the first failure aborts the rest and earlier pages stay
/// applied.
pub fn apply_writeback(
    table: &mut dyn SheetTable,
    plan: &WritebackPlan,
    range: &SheetRange,
    page_size: usize,
) -> Result<WritebackStats> {
    let page_size = page_size.max(1);
    let mut stats = WritebackStats::default();

    for (page, chunk) in plan.updates.chunks(page_size).enumerate() {
        tracing::debug!(event = "writeback_update_page", page, rows = chunk.len());
        table
            .batch_update(chunk)
            .wrap_err_with(|| format!("update page {page} ({} rows) on {}", chunk.len(), table.name()))?;
        stats.rows_updated += chunk.len();
        stats.pages += 1;
    }
    if plan.updates.is_empty() {
        tracing::debug!(event = "writeback_no_updates");
    }

    let append_range = range.quoted_sheet();
    for (page, chunk) in plan.appends.chunks(page_size).enumerate() {
        tracing::debug!(event = "writeback_append_page", page, rows = chunk.len());
        table
            .append(&append_range, chunk)
            .wrap_err_with(|| format!("append page {page} ({} rows) on {}", chunk.len(), table.name()))?;
        stats.rows_appended += chunk.len();
        stats.pages += 1;
    }
    if plan.appends.is_empty() {
        tracing::debug!(event = "writeback_no_appends");
    }

    Ok(stats)
}
