use std::collections::BTreeSet;

use crate::entry::SheetEntryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEventKind {
    /// A local key got a new sheet row.
    Added,
    /// A local value was overwritten by the sheet value.
    Updated,
    /// A sheet cell was filled from a local value for the first time.
    Seeded,
    /// A pruned row was seen again and marked used.
    Reused,
    /// A row absent from every local file was marked unused.
    Pruned,
}

impl SyncEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncEventKind::Added => "added",
            SyncEventKind::Updated => "updated",
            SyncEventKind::Seeded => "seeded",
            SyncEventKind::Reused => "reused",
            SyncEventKind::Pruned => "pruned",
        }
    }
}

/// One notification for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub kind: SyncEventKind,
    pub key: SheetEntryKey,
    /// Language column involved, for `Updated` and `Seeded`.
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStatEntry {
    pub count: usize,
    pub namespaces: BTreeSet<String>,
}

impl ProcessStatEntry {
    fn record(&mut self, namespace: &str) {
        self.count += 1;
        if !self.namespaces.contains(namespace) {
            self.namespaces.insert(namespace.to_string());
        }
    }
}

/// Counters for one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub added: ProcessStatEntry,
    pub updated: ProcessStatEntry,
    pub reused: ProcessStatEntry,
    pub pruned: ProcessStatEntry,
    pub events: Vec<SyncEvent>,
}

impl ProcessStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and bump the matching counter. `Seeded` has no
    /// counter of its own.
    pub fn record(&mut self, kind: SyncEventKind, key: &SheetEntryKey, lang: Option<&str>) {
        let counter = match kind {
            SyncEventKind::Added => Some(&mut self.added),
            SyncEventKind::Updated => Some(&mut self.updated),
            SyncEventKind::Reused => Some(&mut self.reused),
            SyncEventKind::Pruned => Some(&mut self.pruned),
            SyncEventKind::Seeded => None,
        };
        if let Some(counter) = counter {
            counter.record(&key.namespace);
        }
        self.events.push(SyncEvent {
            kind,
            key: key.clone(),
            lang: lang.map(str::to_string),
        });
    }

    /// True when the run changed nothing worth reporting.
    pub fn is_unchanged(&self) -> bool {
        self.added.count == 0
            && self.updated.count == 0
            && self.reused.count == 0
            && self.pruned.count == 0
    }
}
