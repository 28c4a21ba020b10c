//! Kanban grouping and summary analytics.
//!
//! Grouping buckets a filtered view by status into a fixed, caller-supplied
//! column set. Records whose status matches no column are dropped from the
//! board but still count toward the analytics computed over the same view.

use serde::{Deserialize, Serialize};

use crate::model::record::{Priority, Record};

/// One kanban column: a status and the records in it, in view order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusColumn {
    pub status: String,
    pub records: Vec<Record>,
}

/// Bucket records by status into the given columns, in column order.
///
/// A record lands in the column whose status string equals its own; records
/// with no status or an unknown status are omitted from the board.
#[must_use]
pub fn group_by_status(records: &[Record], columns: &[&str]) -> Vec<StatusColumn> {
    columns
        .iter()
        .map(|&status| StatusColumn {
            status: status.to_string(),
            records: records
                .iter()
                .filter(|r| r.status.as_deref() == Some(status))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Summary analytics over a (typically filtered) set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total: usize,
    pub high_priority: usize,
    pub overdue: usize,
    pub total_value: f64,
    pub with_contacts: usize,
    /// Mean contacts per record, rounded to one decimal; 0.0 for an empty set.
    pub avg_contacts: f64,
}

/// Compute analytics over the given set. Absent numeric fields count as 0;
/// the overdue predicate matches the filter engine's.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_analytics(records: &[Record], today: &str) -> Analytics {
    let total = records.len();
    let contact_sum: usize = records.iter().map(Record::contact_count).sum();
    let avg_contacts = if total == 0 {
        0.0
    } else {
        let raw = contact_sum as f64 / total as f64;
        (raw * 10.0).round() / 10.0
    };

    Analytics {
        total,
        high_priority: records
            .iter()
            .filter(|r| r.priority == Some(Priority::High))
            .count(),
        overdue: records.iter().filter(|r| r.is_overdue(today)).count(),
        total_value: records.iter().map(Record::value).sum(),
        with_contacts: records.iter().filter(|r| r.contact_count() > 0).count(),
        avg_contacts,
    }
}
