use std::collections::BTreeMap;

use indexmap::IndexMap;

/// One namespace file: flat key -> translated string, in file order.
pub type FileLocaleNamespace = IndexMap<String, String>;

/// Namespaces of one language, keyed by path relative to the language dir.
pub type FileLocaleLang = BTreeMap<String, FileLocaleNamespace>;

/// Every language found under the locales root.
pub type FileLocale = BTreeMap<String, FileLocaleLang>;
