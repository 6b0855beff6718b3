//! The route table: ordered prefix → target entries.
//!
//! # Responsibilities
//! - First-match lookup over prefixes in first-registration order
//! - Register new entries / update targets in place
//! - Hand out immutable snapshots for display
//!
//! # Design Decisions
//! - Copy-on-write via `ArcSwap`: lookups load a complete snapshot and can
//!   never observe a half-written entry, registers build a replacement vector
//!   under a writer mutex and publish it atomically
//! - First registered prefix wins on ambiguity; registration order is part of
//!   the table's contract (no longest-match, no normalization)

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use url::Url;

/// One routing rule. Identity is the prefix; the target is replaced in place
/// by updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub prefix: String,
    pub target: Url,
}

#[derive(Debug)]
pub struct RouteTable {
    entries: ArcSwap<Vec<RouteEntry>>,
    write: Mutex<()>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
            write: Mutex::new(()),
        }
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `prefix` at the end of the match order, or replace its target
    /// if already registered (match order unchanged). Never fails.
    pub fn register(&self, prefix: &str, target: Url) {
        let writer = self.write_guard();
        self.install(&writer, prefix, target);
    }

    /// First entry in registration order whose prefix starts `path`.
    /// Only the path takes part in matching, never query or fragment.
    pub fn lookup(&self, path: &str) -> Option<RouteEntry> {
        self.entries
            .load()
            .iter()
            .find(|entry| path.starts_with(&entry.prefix))
            .cloned()
    }

    /// Exact-prefix fetch, used by the admin transactions.
    pub fn target_of(&self, prefix: &str) -> Option<Url> {
        self.entries
            .load()
            .iter()
            .find(|entry| entry.prefix == prefix)
            .map(|entry| entry.target.clone())
    }

    /// Immutable ordered view of the table.
    pub fn snapshot(&self) -> Arc<Vec<RouteEntry>> {
        self.entries.load_full()
    }

    /// Serialize writers. Held across multi-step admin transactions so the
    /// read-capture-write sequence in `Routes::develop` is atomic relative to
    /// other admin calls.
    pub(crate) fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a register; the `_writer` token proves the caller holds the
    /// writer mutex.
    pub(crate) fn install(&self, _writer: &MutexGuard<'_, ()>, prefix: &str, target: Url) {
        let mut next: Vec<RouteEntry> = (**self.entries.load()).clone();
        match next.iter_mut().find(|entry| entry.prefix == prefix) {
            Some(entry) => entry.target = target,
            None => next.push(RouteEntry {
                prefix: prefix.to_string(),
                target,
            }),
        }
        self.entries.store(Arc::new(next));
    }
}
