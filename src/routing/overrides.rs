//! Backup targets for routes under an active override.
//!
//! An entry exists only while a prefix has been `develop`ed away from its
//! last-known-good target and not yet `use`d back.

use dashmap::DashMap;
use url::Url;

#[derive(Debug, Default)]
pub struct OverrideStore {
    backups: DashMap<String, Url>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `current` as the backup for `prefix` unless one is already
    /// held. Capture is idempotent: repeated overrides keep the first backup.
    pub fn capture_if_absent(&self, prefix: &str, current: Url) {
        self.backups.entry(prefix.to_string()).or_insert(current);
    }

    /// Return and clear the backup for `prefix`.
    pub fn take(&self, prefix: &str) -> Option<Url> {
        self.backups.remove(prefix).map(|(_, target)| target)
    }
}
