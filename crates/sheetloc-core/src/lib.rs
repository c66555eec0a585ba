//! Shared data model for sheetloc.
//!
//! Everything here is pure: no file system and no network. Loaders and
//! writers live in `sheetloc-services`; the merge algorithm lives in
//! `sheetloc-reconcile`.

use thiserror::Error;

pub mod entry;
pub mod file_locale;
pub mod key;
pub mod locale;
pub mod mapping;
pub mod range;
pub mod stats;

pub use entry::{SheetEntry, SheetEntryKey, SheetValues};
pub use file_locale::{FileLocale, FileLocaleLang, FileLocaleNamespace};
pub use locale::SheetLocale;
pub use range::{CellRef, SheetRange};
pub use stats::{ProcessStatEntry, ProcessStats, SyncEvent, SyncEventKind};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Value of the `used` column for rows present in at least one local file.
pub const USED_TRUE: &str = "TRUE";
/// Value of the `used` column for soft-deleted rows.
pub const USED_FALSE: &str = "FALSE";

/// Typed failures that callers may want to match on.
#[derive(Debug, Error)]
pub enum SheetLocError {
    #[error("invalid range `{0}`")]
    InvalidRange(String),
    #[error("invalid cell reference `{0}`")]
    InvalidCell(String),
    #[error("sheet range `{0}` has no header row")]
    EmptySheet(String),
    #[error("{path}: expected a flat object of strings ({detail})")]
    NotFlatNamespace { path: String, detail: String },
    #[error("remote table returned {status}: {body}")]
    Remote { status: u16, body: String },
}

/// Timestamp format written to the `created_at` column.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time rendered for the `created_at` column.
pub fn created_at_now() -> String {
    chrono::Local::now().format(CREATED_AT_FORMAT).to_string()
}
