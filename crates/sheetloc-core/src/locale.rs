use std::collections::HashMap;

use crate::entry::{SheetEntry, SheetEntryKey};

/// In-memory copy of the remote table.
///
/// Entries keep their load order and are only ever appended. The index maps
/// each composite key to its entry; rows are never removed, pruning only
/// flips the `used` column.
#[derive(Debug, Default)]
pub struct SheetLocale {
    entries: Vec<SheetEntry>,
    index: HashMap<(String, String), usize>,
}

impl SheetLocale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SheetEntryKey) -> Option<&SheetEntry> {
        self.index.get(&key.index_key()).map(|&pos| &self.entries[pos])
    }

    pub fn get_mut(&mut self, key: &SheetEntryKey) -> Option<&mut SheetEntry> {
        match self.index.get(&key.index_key()) {
            Some(&pos) => Some(&mut self.entries[pos]),
            None => None,
        }
    }

    /// Append `entry` and index it.
    ///
    /// Returns `true` when another entry already held the same key. The new
    /// entry wins the index; both stay in the sequence so their rows are
    /// still written back untouched.
    pub fn insert(&mut self, entry: SheetEntry) -> bool {
        let pos = self.entries.len();
        let shadowed = self.index.insert(entry.key.index_key(), pos).is_some();
        self.entries.push(entry);
        shadowed
    }

    /// Insert every entry, returning the keys that were already indexed.
    pub fn insert_all<I>(&mut self, entries: I) -> Vec<SheetEntryKey>
    where
        I: IntoIterator<Item = SheetEntry>,
    {
        let mut duplicates = Vec::new();
        for entry in entries {
            let key = entry.key.clone();
            if self.insert(entry) {
                duplicates.push(key);
            }
        }
        duplicates
    }

    /// Look up `key`, inserting `make()` when absent. The flag is `true`
    /// when a new entry was created.
    pub fn get_or_insert_with<F>(&mut self, key: &SheetEntryKey, make: F) -> (&mut SheetEntry, bool)
    where
        F: FnOnce() -> SheetEntry,
    {
        let index_key = key.index_key();
        let (pos, created) = match self.index.get(&index_key) {
            Some(&pos) => (pos, false),
            None => {
                let pos = self.entries.len();
                self.entries.push(make());
                self.index.insert(index_key, pos);
                (pos, true)
            }
        };
        (&mut self.entries[pos], created)
    }

    /// Clear per-run flags before a new reconciliation pass.
    pub fn begin_run(&mut self) {
        for entry in &mut self.entries {
            entry.has_visited = false;
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SheetEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SheetEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SheetLocale {
    type Item = &'a SheetEntry;
    type IntoIter = std::slice::Iter<'a, SheetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
