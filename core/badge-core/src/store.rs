//! In-memory tab state.
//!
//! One [`TabRecord`] per tab, replaced wholesale on every qualifying response.
//! The store lives for the lifetime of the host process and is cleared when the
//! extension is installed, updated or reloaded. Nothing is persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use status_badge_protocol::{TabId, TabRecord};

#[derive(Debug, Default)]
pub struct TabStateStore {
    tabs: HashMap<TabId, TabRecord>,
}

impl TabStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any existing record for `tab_id`, stamping it with the
    /// current time.
    pub fn put(&mut self, tab_id: TabId, record: TabRecord) {
        self.put_at(tab_id, record, Utc::now());
    }

    /// Same as [`put`](Self::put) with an explicit clock reading.
    ///
    /// `last_updated` never moves backwards for a tab that already has a
    /// record, even if the clock does.
    pub fn put_at(&mut self, tab_id: TabId, mut record: TabRecord, now: DateTime<Utc>) {
        record.last_updated = match self.tabs.get(&tab_id) {
            Some(previous) => previous.last_updated.max(now),
            None => now,
        };
        self.tabs.insert(tab_id, record);
    }

    pub fn get(&self, tab_id: TabId) -> Option<&TabRecord> {
        self.tabs.get(&tab_id)
    }

    /// Status code to badge with, if the tab has a usable record.
    ///
    /// A record with a zero status is treated as absent.
    pub fn status_for(&self, tab_id: TabId) -> Option<u16> {
        self.get(tab_id)
            .map(|record| record.status_code)
            .filter(|status| *status != 0)
    }

    pub fn remove(&mut self, tab_id: TabId) -> Option<TabRecord> {
        self.tabs.remove(&tab_id)
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
