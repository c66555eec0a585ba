//! A CSV file standing in for the remote sheet.
//!
//! Useful for offline runs and fixtures: the file is the single tab (the
//! tab name of a range is ignored) and it is rewritten after every write.
//! A range anchor (`Sheet1!B3`) places the table inside the file the same
//! way it does on a real sheet. Written cells are stored the way the Sheets
//! API stores `USER_ENTERED` text: one leading `'` is dropped.

use color_eyre::eyre::{eyre, Result, WrapErr};
use sheetloc_core::SheetRange;
use sheetloc_table_api::{RangeWrite, SheetTable};
use std::path::{Path, PathBuf};

pub struct CsvTable {
    path: PathBuf,
    name: String,
    grid: Vec<Vec<String>>,
    /// First column of the table, taken from the last range read.
    anchor_column: usize,
}

/// Cell text as stored after a `USER_ENTERED` write.
fn user_entered(value: &str) -> &str {
    value.strip_prefix('\'').unwrap_or(value)
}

impl CsvTable {
    /// Load the table from an existing CSV file.
    pub fn open(path: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .wrap_err_with(|| format!("open table {}", path.display()))?;
        let mut grid = Vec::new();
        for record in rdr.records() {
            let record = record.wrap_err_with(|| format!("read table {}", path.display()))?;
            grid.push(record.iter().map(str::to_string).collect());
        }
        tracing::debug!(event = "csv_table_open", path = %path.display(), rows = grid.len());
        Ok(Self {
            path: path.to_path_buf(),
            name: path.display().to_string(),
            grid,
            anchor_column: 1,
        })
    }

    /// Current rows, including the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.grid
    }

    fn save(&self) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .wrap_err_with(|| format!("write table {}", self.path.display()))?;
        for row in &self.grid {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn set_cell(&mut self, row: usize, column: usize, value: &str) {
        if self.grid.len() <= row {
            self.grid.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.grid[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = user_entered(value).to_string();
    }
}

impl SheetTable for CsvTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, range: &str) -> Result<Vec<Vec<String>>> {
        let range = SheetRange::parse(range)?;
        let skip_rows = range.anchor_row() - 1;
        let skip_cols = range.anchor_column() - 1;
        self.anchor_column = range.anchor_column();
        // The Sheets API omits trailing empty cells; mirror that so a blank
        // cell at the end of a row reads as never filled.
        Ok(self
            .grid
            .iter()
            .skip(skip_rows)
            .map(|row| {
                let cells = row.get(skip_cols..).unwrap_or_default();
                let end = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
                cells[..end].to_vec()
            })
            .collect())
    }

    fn batch_update(&mut self, data: &[RangeWrite]) -> Result<()> {
        for write in data {
            let range = SheetRange::parse(&write.range)?;
            let start = range
                .start
                .ok_or_else(|| eyre!("range {} has no start cell", write.range))?;
            let (Some(column), Some(row)) = (start.column, start.row) else {
                return Err(eyre!("range {} needs a column and a row", write.range));
            };
            for (i, cells) in write.rows.iter().enumerate() {
                for (j, value) in cells.iter().enumerate() {
                    self.set_cell(row - 1 + i, column - 1 + j, value);
                }
            }
        }
        self.save()
    }

    fn append(&mut self, _range: &str, rows: &[Vec<String>]) -> Result<()> {
        while self.grid.last().is_some_and(|r| r.iter().all(String::is_empty)) {
            self.grid.pop();
        }
        let pad = self.anchor_column - 1;
        for row in rows {
            let mut cells = vec![String::new(); pad];
            cells.extend(row.iter().map(|c| user_entered(c).to_string()));
            self.grid.push(cells);
        }
        self.save()
    }
}
