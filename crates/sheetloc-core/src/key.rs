//! Flat key codec.
//!
//! Local JSON files store plural and gender variants as `key_suffix`
//! (`apple_one`, `apple_other`). The sheet keeps the base key and the
//! suffix in separate columns. The split point is the last `_` followed by
//! a run of ASCII lowercase letters reaching the end of the string.

/// Split a flat key into `(key, suffix)`.
///
/// The suffix is not validated against the label table; unknown tokens are
/// returned as-is and simply have no sheet label.
pub fn parse(flat_key: &str) -> (&str, Option<&str>) {
    let bytes = flat_key.as_bytes();
    let mut start = bytes.len();
    while start > 0 && bytes[start - 1].is_ascii_lowercase() {
        start -= 1;
    }
    if start == bytes.len() || start == 0 || bytes[start - 1] != b'_' {
        return (flat_key, None);
    }
    (&flat_key[..start - 1], Some(&flat_key[start..]))
}

/// Inverse of [`parse`]: `key` alone when there is no suffix.
pub fn format(key: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(s) if !s.is_empty() => format!("{key}_{s}"),
        _ => key.to_string(),
    }
}
