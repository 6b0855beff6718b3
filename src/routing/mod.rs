//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Proxied request path
//!     → RouteTable::lookup (immutable snapshot, first-registered prefix wins)
//!     → http::director rewrites toward the matched target
//!
//! Admin request
//!     → Routes::develop / Routes::restore (writer-lock transaction)
//!     → RouteTable updated, OverrideStore captures/releases the backup
//! ```
//!
//! # Design Decisions
//! - Readers never lock: the table publishes copy-on-write snapshots
//! - Match order is first-registration order, stable across target updates
//! - develop/use run as one critical section under the table writer mutex,
//!   so the capture-once invariant holds against concurrent admin calls

pub mod overrides;
pub mod table;

use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

pub use overrides::OverrideStore;
pub use table::{RouteEntry, RouteTable};

/// Admin call named a prefix that is not in the route table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("No such route {0}")]
pub struct UnknownRoute(pub String);

/// Outcome of a `use` call.
#[derive(Debug)]
pub struct Restored {
    /// The route's target after any restore.
    pub target: Url,
    /// Whether a backup was actually moved back into the table.
    pub restored: bool,
}

/// Route table plus the override backups, with the admin transactions
/// that touch both.
#[derive(Debug, Default)]
pub struct Routes {
    table: RouteTable,
    overrides: OverrideStore,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from ordered `(prefix, target)` pairs. Match order is
    /// the iteration order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Url)>) -> Self {
        let routes = Self::new();
        for (prefix, target) in pairs {
            routes.register(&prefix, target);
        }
        routes
    }

    pub fn register(&self, prefix: &str, target: Url) {
        self.table.register(prefix, target);
    }

    pub fn lookup(&self, path: &str) -> Option<RouteEntry> {
        self.table.lookup(path)
    }

    pub fn target_of(&self, prefix: &str) -> Option<Url> {
        self.table.target_of(prefix)
    }

    pub fn snapshot(&self) -> Arc<Vec<RouteEntry>> {
        self.table.snapshot()
    }

    /// Point `prefix` at `at`, keeping the pre-override target for a later
    /// `restore`. The first develop on a prefix captures the backup; repeated
    /// develops keep the original backup (last-known-good, not last-override).
    pub fn develop(&self, prefix: &str, at: Url) -> Result<(), UnknownRoute> {
        let writer = self.table.write_guard();
        let current = self
            .table
            .target_of(prefix)
            .ok_or_else(|| UnknownRoute(prefix.to_string()))?;
        self.overrides.capture_if_absent(prefix, current);
        self.table.install(&writer, prefix, at);
        Ok(())
    }

    /// Revert `prefix` to its backed-up target, if one exists. Without a
    /// backup this leaves the target alone but still succeeds.
    pub fn restore(&self, prefix: &str) -> Result<Restored, UnknownRoute> {
        let writer = self.table.write_guard();
        if self.table.target_of(prefix).is_none() {
            return Err(UnknownRoute(prefix.to_string()));
        }
        let restored = match self.overrides.take(prefix) {
            Some(backup) => {
                self.table.install(&writer, prefix, backup);
                true
            }
            None => false,
        };
        let target = self
            .table
            .target_of(prefix)
            .expect("prefix present under writer lock");
        Ok(Restored { target, restored })
    }

    /// Render the table as `prefix -> target` lines in match order.
    pub fn render(&self) -> String {
        let mut out = String::from("{\n");
        for entry in self.snapshot().iter() {
            let _ = writeln!(out, "  {} -> {}", entry.prefix, entry.target);
        }
        out.push('}');
        out
    }
}
