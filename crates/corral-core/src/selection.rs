//! Bulk-mode selection state.
//!
//! Selected ids live in a caller-owned set that may go stale when the view
//! changes underneath it — materialization tolerates vanished ids, and
//! "select all" always rebuilds from the view it is given instead of
//! unioning with leftovers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::record::Record;

/// Selection mode flag plus the selected id set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub active: bool,
    pub ids: BTreeSet<String>,
}

impl Selection {
    /// Flip membership of one id.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Replace the selection with exactly the ids in the given view.
    /// Never unions with a prior, possibly stale, selection.
    pub fn select_all(&mut self, view: &[Record]) {
        self.ids = view.iter().map(|r| r.id.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Leave bulk mode and drop the selection atomically, so a stale set
    /// can never feed a later bulk operation.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.ids.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Map the selected ids against the current full record list, in
    /// record-list order. Ids that no longer resolve are silently dropped.
    #[must_use]
    pub fn materialize(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.ids.contains(&r.id))
            .cloned()
            .collect()
    }
}
