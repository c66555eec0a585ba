use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "sheetloc.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetLocConfig {
    /// Local locales root (one sub-directory per language).
    pub path: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub range: Option<String>,
    /// Name of the environment variable holding the API access token.
    pub access_token_env: Option<String>,
    pub sync: Option<SyncCfg>,
    pub schema: Option<SchemaCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncCfg {
    pub escape_non_printable: Option<bool>,
    pub page_size: Option<usize>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCfg {
    pub out_dir: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Search order: CWD/sheetloc.toml, then `<config dir>/sheetloc/sheetloc.toml`.
/// Earlier files win field by field.
pub fn load_config() -> Result<SheetLocConfig, ConfigError> {
    let mut candidates = Vec::new();
    if let Ok(p) = std::env::current_dir() {
        candidates.push(p.join(CONFIG_FILE));
    }
    if let Some(base) = dirs::config_dir() {
        candidates.push(base.join("sheetloc").join(CONFIG_FILE));
    }
    load_from(&candidates)
}

/// Merge the given files in priority order; missing files are skipped.
pub fn load_from(paths: &[PathBuf]) -> Result<SheetLocConfig, ConfigError> {
    let mut merged = SheetLocConfig::default();
    for path in paths {
        if let Some(cfg) = read_file(path)? {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_file(path: &Path) -> Result<Option<SheetLocConfig>, ConfigError> {
    let Ok(s) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    toml::from_str::<SheetLocConfig>(&s)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge(mut a: SheetLocConfig, b: SheetLocConfig) -> SheetLocConfig {
    if a.path.is_none() {
        a.path = b.path;
    }
    if a.spreadsheet_id.is_none() {
        a.spreadsheet_id = b.spreadsheet_id;
    }
    if a.range.is_none() {
        a.range = b.range;
    }
    if a.access_token_env.is_none() {
        a.access_token_env = b.access_token_env;
    }
    a.sync = merge_opt(a.sync, b.sync, merge_sync);
    a.schema = merge_opt(a.schema, b.schema, merge_schema);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_sync(mut a: SyncCfg, b: SyncCfg) -> SyncCfg {
    if a.escape_non_printable.is_none() {
        a.escape_non_printable = b.escape_non_printable;
    }
    if a.page_size.is_none() {
        a.page_size = b.page_size;
    }
    if a.dry_run.is_none() {
        a.dry_run = b.dry_run;
    }
    a
}

fn merge_schema(mut a: SchemaCfg, b: SchemaCfg) -> SchemaCfg {
    if a.out_dir.is_none() {
        a.out_dir = b.out_dir;
    }
    a
}
