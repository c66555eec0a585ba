use std::collections::HashMap;
use std::fmt;

use crate::mapping::{self, COL_CREATED_AT, COL_KEY, COL_NAMESPACE, COL_SUFFIX, COL_USED};
use crate::{key, USED_TRUE};

/// Identity of one translation unit across the sheet and the local files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetEntryKey {
    pub namespace: String,
    pub key: String,
    pub suffix: Option<String>,
}

impl SheetEntryKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, suffix: Option<&str>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            suffix: suffix.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    /// Build the key for a local `(namespace, flat_key)` pair.
    pub fn from_flat(namespace: &str, flat_key: &str) -> Self {
        let (key, suffix) = key::parse(flat_key);
        Self::new(namespace, key, suffix)
    }

    /// Key as it appears in the local JSON file.
    pub fn flat_key(&self) -> String {
        key::format(&self.key, self.suffix.as_deref())
    }

    /// Lookup form used by the catalog index: namespace plus flat key.
    /// A sheet row that spells the suffix inside its key column resolves to
    /// the same entry as one using the suffix column.
    pub(crate) fn index_key(&self) -> (String, String) {
        (self.namespace.clone(), self.flat_key())
    }
}

impl fmt::Display for SheetEntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}$${}", self.namespace, self.flat_key())
    }
}

/// Column values of one sheet row keyed by column name.
///
/// A column with no entry is null: the row never had a cell there. A
/// present empty string is a blank cell someone left empty on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetValues {
    cells: HashMap<String, String>,
}

impl SheetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SheetValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One logical row of the remote table.
#[derive(Debug, Clone)]
pub struct SheetEntry {
    /// Zero-based position among the sheet's data rows; `None` until appended.
    pub row_id: Option<usize>,
    pub key: SheetEntryKey,
    pub values: SheetValues,
    pub has_changed: bool,
    pub has_visited: bool,
    /// Original cells, kept for columns without a name.
    pub raw_values: Option<Vec<String>>,
}

impl SheetEntry {
    /// Entry loaded from an existing sheet row.
    pub fn from_row(
        row_id: usize,
        key: SheetEntryKey,
        values: SheetValues,
        raw_values: Vec<String>,
    ) -> Self {
        Self {
            row_id: Some(row_id),
            key,
            values,
            has_changed: false,
            has_visited: false,
            raw_values: Some(raw_values),
        }
    }

    /// Fresh entry for a key that only exists locally. Starts changed and
    /// visited so it is appended and never pruned in the same run.
    pub fn new_local(key: SheetEntryKey, created_at: &str) -> Self {
        let mut values = SheetValues::new();
        values.set(COL_NAMESPACE, key.namespace.as_str());
        values.set(COL_KEY, key.key.as_str());
        if let Some(label) = key.suffix.as_deref().and_then(mapping::label_for_suffix) {
            values.set(COL_SUFFIX, label);
        }
        values.set(COL_USED, USED_TRUE);
        values.set(COL_CREATED_AT, created_at);
        Self {
            row_id: None,
            key,
            values,
            has_changed: true,
            has_visited: true,
            raw_values: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    pub fn used(&self) -> Option<&str> {
        self.values.get(COL_USED)
    }

    /// Cell for `column` or, for unnamed columns, the raw cell at `index`.
    pub fn cell(&self, column: Option<&str>, index: usize) -> &str {
        match column {
            Some(name) => self.values.get(name).unwrap_or(""),
            None => self
                .raw_values
                .as_ref()
                .and_then(|raw| raw.get(index))
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}
