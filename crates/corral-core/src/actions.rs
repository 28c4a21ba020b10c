//! External persistence contract and the sequential bulk executor.
//!
//! The core never persists anything itself. Mutations go through
//! [`CrmStore`], an externally-implemented collaborator whose calls return
//! structured outcomes instead of panicking. Bulk operations process the
//! selection sequentially with an optional inter-item delay — a courtesy
//! to a rate-limited backend, not a correctness requirement — and isolate
//! per-item failures: one rejected item never aborts the rest of the
//! batch.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::model::record::{Note, Record, RecordKind};

/// Result of a single external mutation call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    /// Id assigned by the store on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionOutcome {
    #[must_use]
    pub fn ok(id: Option<String>) -> Self {
        Self {
            success: true,
            id,
            message: None,
        }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            message: Some(message.into()),
        }
    }
}

/// The external persistence collaborator.
///
/// Implementations own the authoritative state; the core only hands them
/// fully-validated intents and reads back outcomes.
pub trait CrmStore {
    fn create_item(&mut self, kind: RecordKind, record: &Record) -> ActionOutcome;
    fn update_item(&mut self, kind: RecordKind, id: &str, patch: &serde_json::Value)
        -> ActionOutcome;
    fn delete_item(&mut self, kind: RecordKind, id: &str) -> ActionOutcome;
    fn add_note(&mut self, kind: RecordKind, id: &str, text: &str) -> ActionOutcome;
    fn update_note(&mut self, kind: RecordKind, id: &str, note: &Note) -> ActionOutcome;
    fn delete_note(&mut self, kind: RecordKind, id: &str, timestamp: i64) -> ActionOutcome;
}

/// The two store-mutating bulk operations. Export is not here: it only
/// materializes rows (see [`crate::csv`]) and never calls the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkOp {
    Delete,
    /// Append a tag to each selected record.
    Tag(String),
}

/// One failed item in a bulk batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkError {
    pub id: String,
    pub error: String,
}

/// Aggregate outcome of a bulk batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<BulkError>,
}

/// Run a bulk operation over already-materialized records, sequentially.
///
/// Every item is attempted regardless of earlier failures; the report
/// carries per-item errors alongside the aggregate counts. `delay` is
/// slept between items (not after the last) to avoid hammering a
/// downstream API.
pub fn run_bulk(
    store: &mut dyn CrmStore,
    records: &[Record],
    op: &BulkOp,
    delay: Duration,
) -> BulkReport {
    let mut report = BulkReport::default();

    for (i, record) in records.iter().enumerate() {
        let outcome = match op {
            BulkOp::Delete => store.delete_item(record.kind, &record.id),
            BulkOp::Tag(tag) => {
                let mut tags = record.tags.clone();
                if !tags.iter().any(|t| t == tag) {
                    tags.push(tag.clone());
                }
                store.update_item(record.kind, &record.id, &serde_json::json!({ "tags": tags }))
            }
        };

        if outcome.success {
            report.success += 1;
            debug!(id = %record.id, "bulk item ok");
        } else {
            report.failed += 1;
            let error = outcome.message.unwrap_or_else(|| "rejected".to_string());
            warn!(id = %record.id, %error, "bulk item failed, continuing");
            report.errors.push(BulkError {
                id: record.id.clone(),
                error,
            });
        }

        if !delay.is_zero() && i + 1 < records.len() {
            std::thread::sleep(delay);
        }
    }

    report
}
