//! Header and suffix label tables used by the shared translation sheet.

pub const COL_NAMESPACE: &str = "namespace";
pub const COL_KEY: &str = "key";
pub const COL_SUFFIX: &str = "suffix";
pub const COL_USED: &str = "used";
pub const COL_CREATED_AT: &str = "created_at";

/// Human-facing header label -> internal column name.
/// Headers not listed here are used verbatim as column names.
pub const COLUMN_LABELS: &[(&str, &str)] = &[
    ("네임스페이스", COL_NAMESPACE),
    ("번역 키", COL_KEY),
    ("유형", COL_SUFFIX),
    ("사용여부", COL_USED),
    ("한국어", "ko"),
    ("일본어", "ja"),
    ("영어", "en"),
    ("생성일", COL_CREATED_AT),
];

/// Human-facing suffix label <-> flat key suffix token.
///
/// Only binary plural and gender forms are covered. Languages with more
/// plural categories (Arabic has zero/one/two/few/many/other) need their
/// tokens added here before their variants can round-trip through the sheet.
pub const SUFFIX_LABELS: &[(&str, &str)] = &[
    ("단수", "one"),
    ("복수", "other"),
    ("남성", "male"),
    ("여성", "female"),
];

/// Column name for a header cell. Empty headers have no name.
pub fn column_for_header(header: &str) -> Option<String> {
    if header.is_empty() {
        return None;
    }
    let name = COLUMN_LABELS
        .iter()
        .find(|(label, _)| *label == header)
        .map(|(_, name)| *name)
        .unwrap_or(header);
    Some(name.to_string())
}

/// Suffix token for a sheet label, `None` when the label is unknown.
pub fn suffix_from_label(label: &str) -> Option<&'static str> {
    SUFFIX_LABELS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, token)| *token)
}

/// Sheet label for a suffix token, `None` when the token is unknown.
pub fn label_for_suffix(token: &str) -> Option<&'static str> {
    SUFFIX_LABELS
        .iter()
        .find(|(_, t)| *t == token)
        .map(|(label, _)| *label)
}
