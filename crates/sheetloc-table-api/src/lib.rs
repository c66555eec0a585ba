use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};

/// Values written to one explicit range, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWrite {
    pub range: String,
    pub rows: Vec<Vec<String>>,
}

/// Remote key-value table holding the shared translations.
///
/// Implemented by the Google Sheets client and by the CSV file backend.
/// Calls are issued one at a time; an error aborts the run.
pub trait SheetTable {
    fn name(&self) -> &str;

    /// Every row of `range`, header first. Trailing empty cells may be absent.
    fn read(&mut self, range: &str) -> Result<Vec<Vec<String>>>;

    /// Overwrite each range with its rows.
    fn batch_update(&mut self, data: &[RangeWrite]) -> Result<()>;

    /// Add `rows` after the last row of the table found at `range`.
    fn append(&mut self, range: &str, rows: &[Vec<String>]) -> Result<()>;
}
