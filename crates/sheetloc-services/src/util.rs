use std::io::Write;
use std::path::Path;

/// Write through a uniquely named temp file in the same directory and
/// rename it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Shorten a key for one-line display: whitespace runs collapse to one
/// space and anything past 83 characters is cut to 80 plus `...`.
pub fn truncate_key(key: &str) -> String {
    let collapsed = key.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > 83 {
        let mut out: String = collapsed.chars().take(80).collect();
        out.push_str("...");
        out
    } else {
        collapsed
    }
}
