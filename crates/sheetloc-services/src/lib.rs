//! Orchestration over the lower-level crates: file and sheet IO, the
//! write-back batcher and the sync pipeline used by the CLI.

pub mod file_io;
pub mod google;
pub mod sheet_io;
pub mod sync;
pub mod util;
pub mod writeback;

pub use file_io::{load_file_locale, save_file_locale, SaveOptions};
pub use google::GoogleSheetsTable;
pub use sheet_io::{load_sheet_locale, SheetColumns, SheetLoad, SheetWarning};
pub use sheetloc_core::{Result, SheetRange};
pub use sync::{run_sync, SyncOptions, SyncOutcome};
pub use writeback::{apply_writeback, plan_writeback, WritebackPlan, WritebackStats, INSERT_PAGE_SIZE};
