//! JSON snapshot store.
//!
//! Plays the role of the external persistence collaborator: it owns the
//! authoritative record list, hands the core a snapshot to project views
//! from, and accepts mutation intents through the [`CrmStore`] trait.
//! State lives in `.corral/records.json` under the project root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use corral_core::actions::{ActionOutcome, CrmStore};
use corral_core::model::record::{Note, Record, RecordKind};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    records: Vec<Record>,
}

/// File-backed record store. Mutations happen in memory; callers persist
/// with [`JsonStore::save`] once their batch completes.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: Vec<Record>,
}

impl JsonStore {
    /// Load the snapshot under the given project root. A missing file is
    /// an empty store, not an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(".corral/records.json");
        let records = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let snapshot: Snapshot = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            snapshot.records
        } else {
            Vec::new()
        };
        debug!(count = records.len(), "snapshot loaded");
        Ok(Self { path, records })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let snapshot = Snapshot {
            records: self.records.clone(),
        };
        let raw = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// The current snapshot, for the pipeline to project from.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn next_id(&self) -> String {
        let max = self
            .records
            .iter()
            .filter_map(|r| r.id.strip_prefix("rec-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("rec-{}", max + 1)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.id == id)
    }
}

/// Merge a JSON object patch onto a record, field by field.
fn apply_patch(record: &Record, patch: &serde_json::Value) -> Option<Record> {
    let mut value = serde_json::to_value(record).ok()?;
    if let (Some(target), Some(fields)) = (value.as_object_mut(), patch.as_object()) {
        for (key, field_value) in fields {
            target.insert(key.clone(), field_value.clone());
        }
    }
    serde_json::from_value(value).ok()
}

impl CrmStore for JsonStore {
    fn create_item(&mut self, kind: RecordKind, record: &Record) -> ActionOutcome {
        if record.label.trim().is_empty() {
            return ActionOutcome::rejected("label must not be empty");
        }
        let mut created = record.clone();
        created.kind = kind;
        if created.id.is_empty() {
            created.id = self.next_id();
        } else if self.records.iter().any(|r| r.id == created.id) {
            return ActionOutcome::rejected(format!("id already exists: {}", created.id));
        }
        let id = created.id.clone();
        self.records.push(created);
        ActionOutcome::ok(Some(id))
    }

    fn update_item(
        &mut self,
        _kind: RecordKind,
        id: &str,
        patch: &serde_json::Value,
    ) -> ActionOutcome {
        let Some(record) = self.records.iter().find(|r| r.id == id) else {
            return ActionOutcome::rejected(format!("record not found: {id}"));
        };
        let Some(updated) = apply_patch(record, patch) else {
            return ActionOutcome::rejected("patch did not apply");
        };
        if let Some(slot) = self.find_mut(id) {
            *slot = updated;
        }
        ActionOutcome::ok(None)
    }

    fn delete_item(&mut self, _kind: RecordKind, id: &str) -> ActionOutcome {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            ActionOutcome::rejected(format!("record not found: {id}"))
        } else {
            ActionOutcome::ok(None)
        }
    }

    fn add_note(&mut self, _kind: RecordKind, id: &str, text: &str) -> ActionOutcome {
        let timestamp = chrono::Utc::now().timestamp_millis();
        match self.find_mut(id) {
            Some(record) => {
                record.notes.push(Note {
                    text: text.to_string(),
                    timestamp,
                });
                ActionOutcome::ok(None)
            }
            None => ActionOutcome::rejected(format!("record not found: {id}")),
        }
    }

    fn update_note(&mut self, _kind: RecordKind, id: &str, note: &Note) -> ActionOutcome {
        match self.find_mut(id) {
            Some(record) => {
                match record
                    .notes
                    .iter_mut()
                    .find(|n| n.timestamp == note.timestamp)
                {
                    Some(slot) => {
                        slot.text = note.text.clone();
                        ActionOutcome::ok(None)
                    }
                    None => ActionOutcome::rejected("note not found"),
                }
            }
            None => ActionOutcome::rejected(format!("record not found: {id}")),
        }
    }

    fn delete_note(&mut self, _kind: RecordKind, id: &str, timestamp: i64) -> ActionOutcome {
        match self.find_mut(id) {
            Some(record) => {
                let before = record.notes.len();
                record.notes.retain(|n| n.timestamp != timestamp);
                if record.notes.len() == before {
                    ActionOutcome::rejected("note not found")
                } else {
                    ActionOutcome::ok(None)
                }
            }
            None => ActionOutcome::rejected(format!("record not found: {id}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JsonStore;
    use corral_core::actions::CrmStore;
    use corral_core::model::record::{Record, RecordKind};

    fn empty_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::load(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let (_dir, mut store) = empty_store();
        let record = Record {
            label: "Acme".into(),
            ..Record::default()
        };
        let a = store.create_item(RecordKind::Customer, &record);
        let b = store.create_item(RecordKind::Customer, &record);
        assert_eq!(a.id.as_deref(), Some("rec-1"));
        assert_eq!(b.id.as_deref(), Some("rec-2"));
    }

    #[test]
    fn create_rejects_blank_label_and_duplicate_id() {
        let (_dir, mut store) = empty_store();
        let blank = Record::default();
        assert!(!store.create_item(RecordKind::Customer, &blank).success);

        let named = Record {
            id: "x-1".into(),
            label: "Acme".into(),
            ..Record::default()
        };
        assert!(store.create_item(RecordKind::Customer, &named).success);
        assert!(!store.create_item(RecordKind::Customer, &named).success);
    }

    #[test]
    fn update_merges_patch_fields() {
        let (_dir, mut store) = empty_store();
        let record = Record {
            label: "Acme".into(),
            ..Record::default()
        };
        let id = store
            .create_item(RecordKind::Customer, &record)
            .id
            .unwrap();

        let outcome = store.update_item(
            RecordKind::Customer,
            &id,
            &serde_json::json!({ "status": "active", "tags": ["vip"] }),
        );
        assert!(outcome.success);

        let updated = store.records().iter().find(|r| r.id == id).unwrap();
        assert_eq!(updated.status.as_deref(), Some("active"));
        assert_eq!(updated.tags, ["vip"]);
        assert_eq!(updated.label, "Acme");
    }

    #[test]
    fn delete_and_note_roundtrip() {
        let (_dir, mut store) = empty_store();
        let record = Record {
            label: "Acme".into(),
            ..Record::default()
        };
        let id = store
            .create_item(RecordKind::Customer, &record)
            .id
            .unwrap();

        assert!(store.add_note(RecordKind::Customer, &id, "called").success);
        let ts = store.records()[0].notes[0].timestamp;
        assert!(store.delete_note(RecordKind::Customer, &id, ts).success);
        assert!(!store.delete_note(RecordKind::Customer, &id, ts).success);

        assert!(store.delete_item(RecordKind::Customer, &id).success);
        assert!(!store.delete_item(RecordKind::Customer, &id).success);
    }
}
