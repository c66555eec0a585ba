use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatSummary {
    pub count: usize,
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncEventRecord {
    pub schema_version: u32,
    /// added | updated | seeded | reused | pruned
    pub kind: String,
    pub namespace: String,
    pub key: String,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncWarning {
    /// duplicate-key
    pub kind: String,
    pub key: String,
    pub row: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncReport {
    pub schema_version: u32,
    pub dry_run: bool,
    pub added: StatSummary,
    pub updated: StatSummary,
    pub reused: StatSummary,
    pub pruned: StatSummary,
    pub rows_updated: usize,
    pub rows_appended: usize,
    pub pages: usize,
    pub files_written: usize,
    pub events: Vec<SyncEventRecord>,
    pub warnings: Vec<SyncWarning>,
}
