//! Locales directory on disk: `<root>/<lang>/<namespace>.json`.

use crate::util::write_atomic;
use color_eyre::eyre::WrapErr;
use indexmap::IndexMap;
use regex::Regex;
use sheetloc_core::{FileLocale, FileLocaleLang, FileLocaleNamespace, Result, SheetLocError};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy)]
pub struct SaveOptions {
    /// Write non-ASCII space, control and format characters as `\uXXXX`.
    pub escape_non_printable: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            escape_non_printable: true,
        }
    }
}

/// Read every language directory under `root`.
pub fn load_file_locale(root: &Path) -> Result<FileLocale> {
    let mut locales = FileLocale::new();
    let dir = std::fs::read_dir(root)
        .wrap_err_with(|| format!("read locales root {}", root.display()))?;
    for entry in dir {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let lang = entry.file_name().to_string_lossy().into_owned();
        tracing::debug!(event = "load_language", lang = %lang);
        let data = load_lang(&entry.path())?;
        locales.insert(lang, data);
    }
    Ok(locales)
}

fn load_lang(lang_dir: &Path) -> Result<FileLocaleLang> {
    let mut out = FileLocaleLang::new();
    // Walk errors propagate; a namespace skipped here gets its rows pruned.
    for entry in WalkDir::new(lang_dir).follow_links(true).sort_by_file_name() {
        let entry = entry.wrap_err_with(|| format!("walk {}", lang_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        // `*_old.json` files are kept around for deletion and never synced.
        if name.ends_with("_old.json") || !name.ends_with(".json") {
            continue;
        }
        let Some(namespace) = namespace_name(lang_dir, entry.path()) else {
            continue;
        };
        out.insert(namespace, read_namespace(entry.path())?);
    }
    Ok(out)
}

/// `admin/users` for `<lang_dir>/admin/users.json`.
fn namespace_name(lang_dir: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(lang_dir).ok()?.with_extension("");
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn read_namespace(path: &Path) -> Result<FileLocaleNamespace> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read {}", path.display()))?;
    let not_flat = |detail: String| SheetLocError::NotFlatNamespace {
        path: path.display().to_string(),
        detail,
    };
    let raw: IndexMap<String, serde_json::Value> =
        serde_json::from_str(&text).map_err(|e| not_flat(e.to_string()))?;
    let mut out = FileLocaleNamespace::with_capacity(raw.len());
    for (key, value) in raw {
        match value {
            serde_json::Value::String(s) => {
                out.insert(key, s);
            }
            other => {
                return Err(not_flat(format!("value of `{key}` is {}", json_kind(&other))).into());
            }
        }
    }
    Ok(out)
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Write every namespace back to `<root>/<lang>/<namespace>.json`.
/// Files whose content is unchanged are left untouched. Returns the number
/// of files written.
pub fn save_file_locale(root: &Path, locale: &FileLocale, options: SaveOptions) -> Result<usize> {
    tracing::debug!(event = "save_file_locale", root = %root.display());
    let mut written = 0usize;
    for (lang, lang_data) in locale {
        for (namespace, data) in lang_data {
            let path = namespace_path(root, lang, namespace);
            let bytes = render_namespace(data, options)?;
            if std::fs::read(&path).map(|old| old == bytes).unwrap_or(false) {
                continue;
            }
            write_atomic(&path, &bytes).wrap_err_with(|| format!("write {}", path.display()))?;
            written += 1;
        }
    }
    Ok(written)
}

fn namespace_path(root: &Path, lang: &str, namespace: &str) -> PathBuf {
    let mut path = root.join(lang);
    for part in namespace.split('/') {
        path.push(part);
    }
    let mut file = path.into_os_string();
    file.push(".json");
    PathBuf::from(file)
}

/// Pretty JSON with two-space indent and a trailing newline.
pub fn render_namespace(data: &FileLocaleNamespace, options: SaveOptions) -> Result<Vec<u8>> {
    let mut out = serde_json::to_string_pretty(data)?;
    out.push('\n');
    if options.escape_non_printable {
        out = escape_non_printable(&out).into_owned();
    }
    Ok(out.into_bytes())
}

/// Replace non-ASCII characters of Unicode categories Z, Cc and Cf with
/// JSON `\uXXXX` escapes. Only valid on already-serialized JSON text, where
/// such characters can only occur inside strings.
pub fn escape_non_printable(json: &str) -> Cow<'_, str> {
    static NON_PRINTABLE: OnceLock<Regex> = OnceLock::new();
    let re = NON_PRINTABLE.get_or_init(|| Regex::new(r"[\p{Z}\p{Cc}\p{Cf}]").unwrap());
    re.replace_all(json, |caps: &regex::Captures| {
        let s = &caps[0];
        if s.is_ascii() {
            return s.to_string();
        }
        s.encode_utf16().map(|u| format!("\\u{u:04x}")).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_languages_and_nested_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "en/common.json", r#"{"zeta":"Z","alpha":"A"}"#);
        write(dir.path(), "en/admin/users.json", r#"{"title":"Users"}"#);
        write(dir.path(), "en/legacy_old.json", r#"{"x":"y"}"#);
        write(dir.path(), "en/readme.txt", "not json");
        write(dir.path(), "ko/common.json", r#"{"alpha":"가"}"#);
        write(dir.path(), "stray.json", r#"{"x":"y"}"#);

        let locale = load_file_locale(dir.path()).unwrap();
        assert_eq!(locale.keys().collect::<Vec<_>>(), vec!["en", "ko"]);
        let en = &locale["en"];
        assert_eq!(en.keys().collect::<Vec<_>>(), vec!["admin/users", "common"]);
        assert_eq!(en["common"].keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(locale["ko"]["common"]["alpha"], "가");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entries_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "en/common.json", r#"{"hello":"Hello"}"#);
        std::os::unix::fs::symlink(
            dir.path().join("en/missing.json"),
            dir.path().join("en/dangling.json"),
        )
        .unwrap();

        let err = load_file_locale(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("walk "), "{err}");
    }

    #[test]
    fn nested_objects_are_rejected_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "en/common.json", r#"{"menu":{"open":"Open"}}"#);
        let err = load_file_locale(dir.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("common.json"), "{msg}");
        assert!(msg.contains("an object"), "{msg}");
    }

    #[test]
    fn save_round_trips_and_skips_unchanged_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "en/common.json", "{\n  \"b\": \"B\",\n  \"a\": \"A\"\n}\n");
        write(dir.path(), "en/admin/users.json", r#"{"title":"Users"}"#);

        let mut locale = load_file_locale(dir.path()).unwrap();
        locale
            .get_mut("en")
            .unwrap()
            .get_mut("admin/users")
            .unwrap()
            .insert("title".into(), "Members".into());
        let written = save_file_locale(dir.path(), &locale, SaveOptions::default()).unwrap();

        assert_eq!(written, 1);
        let users = std::fs::read_to_string(dir.path().join("en/admin/users.json")).unwrap();
        assert_eq!(users, "{\n  \"title\": \"Members\"\n}\n");
    }

    #[test]
    fn non_printable_characters_are_escaped() {
        let mut data = FileLocaleNamespace::new();
        data.insert("nbsp".into(), "a\u{00a0}b".into());
        data.insert("zwsp".into(), "c\u{200b}d".into());
        data.insert("plain".into(), "e f\tg 한글".into());
        data.insert("tag".into(), "\u{e0001}".into());

        let escaped = String::from_utf8(render_namespace(&data, SaveOptions::default()).unwrap()).unwrap();
        assert!(escaped.contains(r#""a\u00a0b""#), "{escaped}");
        assert!(escaped.contains(r#""c\u200bd""#), "{escaped}");
        assert!(escaped.contains(r#""e f\tg 한글""#), "{escaped}");
        assert!(escaped.contains(r#""\udb40\udc01""#), "{escaped}");

        let raw = render_namespace(&data, SaveOptions { escape_non_printable: false }).unwrap();
        assert!(String::from_utf8(raw).unwrap().contains("a\u{00a0}b"));
    }
}
