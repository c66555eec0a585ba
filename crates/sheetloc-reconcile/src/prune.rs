use sheetloc_core::mapping::COL_USED;
use sheetloc_core::{ProcessStats, SheetLocale, SyncEventKind, USED_FALSE};

/// Mark every row the visitor did not touch as unused.
///
/// Only the `used` column changes; the row and its translations stay so the
/// key can come back later.
pub fn prune_sheet_locale(sheet: &mut SheetLocale, stats: &mut ProcessStats) {
    for entry in sheet.iter_mut() {
        if !entry.has_visited && entry.used() != Some(USED_FALSE) {
            entry.values.set(COL_USED, USED_FALSE);
            entry.has_changed = true;
            stats.record(SyncEventKind::Pruned, &entry.key, None);
        }
    }
    tracing::debug!(event = "prune_done", pruned = stats.pruned.count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetloc_core::{SheetEntry, SheetEntryKey, SheetValues, USED_TRUE};

    fn row(row_id: usize, key: &str, used: &str) -> SheetEntry {
        let values: SheetValues = [("en", "text"), ("ko", "글"), ("used", used)]
            .into_iter()
            .collect();
        SheetEntry::from_row(row_id, SheetEntryKey::new("common", key, None), values, Vec::new())
    }

    #[test]
    fn unvisited_rows_are_marked_unused_and_keep_values() {
        let mut sheet = SheetLocale::new();
        sheet.insert(row(0, "kept", USED_TRUE));
        sheet.insert(row(1, "gone", USED_TRUE));
        sheet.get_mut(&SheetEntryKey::new("common", "kept", None)).unwrap().has_visited = true;
        let mut stats = ProcessStats::new();

        prune_sheet_locale(&mut sheet, &mut stats);

        let gone = sheet.get(&SheetEntryKey::new("common", "gone", None)).unwrap();
        assert_eq!(gone.used(), Some(USED_FALSE));
        assert_eq!(gone.values.get("en"), Some("text"));
        assert_eq!(gone.values.get("ko"), Some("글"));
        assert_eq!(gone.row_id, Some(1));
        assert!(gone.has_changed);
        let kept = sheet.get(&SheetEntryKey::new("common", "kept", None)).unwrap();
        assert_eq!(kept.used(), Some(USED_TRUE));
        assert!(!kept.has_changed);
        assert_eq!(stats.pruned.count, 1);
        assert!(stats.pruned.namespaces.contains("common"));
    }

    #[test]
    fn pruning_twice_is_the_same_as_once() {
        let mut sheet = SheetLocale::new();
        sheet.insert(row(0, "a", USED_TRUE));
        sheet.insert(row(1, "b", USED_FALSE));
        let mut stats = ProcessStats::new();

        prune_sheet_locale(&mut sheet, &mut stats);
        prune_sheet_locale(&mut sheet, &mut stats);

        assert_eq!(stats.pruned.count, 1);
        let b = sheet.get(&SheetEntryKey::new("common", "b", None)).unwrap();
        assert!(!b.has_changed);
    }

    #[test]
    fn rows_without_used_cell_are_pruned() {
        let mut sheet = SheetLocale::new();
        sheet.insert(SheetEntry::from_row(
            0,
            SheetEntryKey::new("common", "x", None),
            SheetValues::new(),
            Vec::new(),
        ));
        let mut stats = ProcessStats::new();
        prune_sheet_locale(&mut sheet, &mut stats);
        assert_eq!(stats.pruned.count, 1);
    }
}
