use color_eyre::eyre::WrapErr;
use sheetloc_core::mapping::{self, COL_KEY, COL_NAMESPACE, COL_SUFFIX};
use sheetloc_core::{Result, SheetEntry, SheetEntryKey, SheetLocError, SheetLocale, SheetRange, SheetValues};
use sheetloc_table_api::SheetTable;

/// Column names in sheet order; `None` for columns with an empty header.
pub type SheetColumns = Vec<Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetWarning {
    /// Two rows resolve to the same key. The later row wins lookups; both
    /// rows are kept and written back.
    DuplicateKey { key: SheetEntryKey, row_id: usize },
}

#[derive(Debug)]
pub struct SheetLoad {
    pub locale: SheetLocale,
    pub columns: SheetColumns,
    pub warnings: Vec<SheetWarning>,
}

/// Read the table at `range` into a [`SheetLocale`].
pub fn load_sheet_locale(table: &mut dyn SheetTable, range: &SheetRange) -> Result<SheetLoad> {
    let range_str = range.to_string();
    tracing::debug!(event = "read_sheet", table = table.name(), range = %range_str);
    let rows = table
        .read(&range_str)
        .wrap_err_with(|| format!("read {range_str} from {}", table.name()))?;
    let Some((header, data)) = rows.split_first() else {
        return Err(SheetLocError::EmptySheet(range_str).into());
    };
    let columns: SheetColumns = header.iter().map(|h| mapping::column_for_header(h)).collect();

    let mut locale = SheetLocale::new();
    let mut warnings = Vec::new();
    for (row_id, row) in data.iter().enumerate() {
        let Some(entry) = entry_from_row(row_id, row, &columns) else {
            continue;
        };
        let key = entry.key.clone();
        if locale.insert(entry) {
            tracing::warn!(event = "duplicate_sheet_key", key = %key, row = row_id);
            warnings.push(SheetWarning::DuplicateKey { key, row_id });
        }
    }
    tracing::debug!(event = "read_sheet_done", entries = locale.len(), rows = data.len());
    Ok(SheetLoad {
        locale,
        columns,
        warnings,
    })
}

/// Rows without a namespace or key are skipped; their position still
/// counts so later rows keep their `row_id`.
fn entry_from_row(row_id: usize, row: &[String], columns: &SheetColumns) -> Option<SheetEntry> {
    let mut values = SheetValues::new();
    for (name, cell) in columns.iter().zip(row) {
        if let Some(name) = name {
            values.set(name.as_str(), cell.as_str());
        }
    }
    let namespace = values.get(COL_NAMESPACE).filter(|s| !s.is_empty())?.to_string();
    let key = values.get(COL_KEY).filter(|s| !s.is_empty())?.to_string();
    let suffix = values.get(COL_SUFFIX).and_then(mapping::suffix_from_label);
    Some(SheetEntry::from_row(
        row_id,
        SheetEntryKey::new(namespace, key, suffix),
        values,
        row.to_vec(),
    ))
}
