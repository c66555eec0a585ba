use sheetloc_core::mapping::COL_USED;
use sheetloc_core::{
    created_at_now, FileLocale, FileLocaleNamespace, ProcessStats, SheetEntry, SheetEntryKey,
    SheetLocale, SyncEventKind, USED_TRUE,
};

/// Merge every language of `file_locale` into `sheet`, stamping new rows
/// with the current local time.
pub fn visit_locale(file_locale: &mut FileLocale, sheet: &mut SheetLocale, stats: &mut ProcessStats) {
    let created_at = created_at_now();
    visit_locale_at(file_locale, sheet, stats, &created_at);
}

/// Same as [`visit_locale`] with an explicit `created_at` value.
pub fn visit_locale_at(
    file_locale: &mut FileLocale,
    sheet: &mut SheetLocale,
    stats: &mut ProcessStats,
    created_at: &str,
) {
    for (lang_name, lang_data) in file_locale.iter_mut() {
        for (namespace_name, namespace_data) in lang_data.iter_mut() {
            visit_locale_namespace(lang_name, namespace_name, namespace_data, sheet, stats, created_at);
        }
    }
}

/// Reconcile one namespace file of one language.
///
/// Per key: a non-blank sheet value overwrites a differing local value; a
/// missing sheet value is seeded from the local one; a blank sheet value is
/// left alone. Rows seen here are marked used and visited.
pub fn visit_locale_namespace(
    lang_name: &str,
    namespace_name: &str,
    namespace_data: &mut FileLocaleNamespace,
    sheet: &mut SheetLocale,
    stats: &mut ProcessStats,
    created_at: &str,
) {
    tracing::debug!(event = "visit_namespace", lang = lang_name, namespace = namespace_name, keys = namespace_data.len());
    for (flat_key, local_value) in namespace_data.iter_mut() {
        let key = SheetEntryKey::from_flat(namespace_name, flat_key);
        let (entry, created) =
            sheet.get_or_insert_with(&key, || SheetEntry::new_local(key.clone(), created_at));
        if created {
            stats.record(SyncEventKind::Added, &entry.key, None);
        }

        match entry.values.get(lang_name) {
            Some(remote) if !remote.trim().is_empty() => {
                if remote != local_value.as_str() {
                    *local_value = remote.to_string();
                    stats.record(SyncEventKind::Updated, &entry.key, Some(lang_name));
                }
            }
            Some(_) => {}
            None => {
                entry.values.set(lang_name, local_value.as_str());
                entry.has_changed = true;
                if !created {
                    stats.record(SyncEventKind::Seeded, &entry.key, Some(lang_name));
                }
            }
        }

        if entry.used() != Some(USED_TRUE) {
            entry.values.set(COL_USED, USED_TRUE);
            entry.has_changed = true;
            stats.record(SyncEventKind::Reused, &entry.key, None);
        }
        entry.has_visited = true;
    }
}
