//! Two passes over the catalogs: [`visit_locale`] merges every local entry
//! into the sheet, then [`prune_sheet_locale`] soft-deletes rows nothing
//! visited. Both only mutate memory and record [`ProcessStats`] events.

mod prune;
mod visitor;

pub use prune::prune_sheet_locale;
pub use visitor::{visit_locale, visit_locale_at, visit_locale_namespace};

pub use sheetloc_core::{ProcessStats, SheetLocale};
