//! Filter predicate engine.
//!
//! Composes independent clauses into one AND-combined predicate. A clause
//! with an empty selector set or a blank string is skipped entirely —
//! "no constraint", never "exclude everything". Order of the input is
//! preserved; sorting is a separate stage.
//!
//! Ambient state the predicates need (today's date, the current user id)
//! arrives explicitly in [`FilterContext`] rather than through globals, so
//! every clause is testable in isolation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CrmError;
use crate::model::record::{Priority, Record, RecordKind};

/// Constraint on a per-record collection count (contacts, notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountFilter {
    /// No constraint.
    #[default]
    Any,
    /// Count must be exactly 0.
    None,
    /// Count must be greater than 0.
    Has,
}

impl CountFilter {
    fn accepts(self, count: usize) -> bool {
        match self {
            Self::Any => true,
            Self::None => count == 0,
            Self::Has => count > 0,
        }
    }
}

impl FromStr for CountFilter {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "none" => Ok(Self::None),
            "has" => Ok(Self::Has),
            _ => Err(CrmError::InvalidEnum {
                expected: "count filter",
                got: s.to_string(),
            }),
        }
    }
}

/// Declarative filter state. `Default` is the match-all state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Case-insensitive substring search over kind-specific fields.
    pub search: String,
    /// Empty set = all categories pass.
    pub categories: Vec<String>,
    /// Empty set = all statuses pass.
    pub statuses: Vec<String>,
    /// Empty set = all priorities pass.
    pub priorities: Vec<Priority>,
    /// Keep only records assigned to the current user.
    pub only_mine: bool,
    /// Keep only records with a next-action date before today.
    pub overdue_only: bool,
    pub contact_count: CountFilter,
    pub note_count: CountFilter,
}

/// Ambient inputs the predicates read, passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterContext {
    /// Today's UTC date as `YYYY-MM-DD`.
    pub today: String,
    /// Id the `only_mine` clause compares assignees against.
    pub current_user: Option<String>,
}

impl FilterContext {
    /// Context pinned to the current UTC date.
    #[must_use]
    pub fn for_today(current_user: Option<String>) -> Self {
        Self {
            today: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            current_user,
        }
    }
}

/// Apply the combined predicate. Pure and order-preserving: survivors keep
/// their relative input order, and the input slice is untouched.
#[must_use]
pub fn filter(records: &[Record], state: &FilterState, ctx: &FilterContext) -> Vec<Record> {
    records
        .iter()
        .filter(|r| matches(r, state, ctx))
        .cloned()
        .collect()
}

/// The combined predicate for a single record.
#[must_use]
pub fn matches(record: &Record, state: &FilterState, ctx: &FilterContext) -> bool {
    matches_category(record, &state.categories)
        && matches_status(record, &state.statuses)
        && matches_priority(record, &state.priorities)
        && matches_search(record, &state.search)
        && matches_mine(record, state.only_mine, ctx.current_user.as_deref())
        && matches_overdue(record, state.overdue_only, &ctx.today)
        && state.contact_count.accepts(record.contact_count())
        && state.note_count.accepts(record.note_count())
}

fn matches_category(record: &Record, selected: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|c| c == record.category())
}

fn matches_status(record: &Record, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    record
        .status
        .as_deref()
        .is_some_and(|s| selected.iter().any(|sel| sel == s))
}

fn matches_priority(record: &Record, selected: &[Priority]) -> bool {
    if selected.is_empty() {
        return true;
    }
    record.priority.is_some_and(|p| selected.contains(&p))
}

/// Case-insensitive substring match against the kind-specific field list.
fn matches_search(record: &Record, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let hit = |field: &str| field.to_lowercase().contains(&needle);

    if hit(&record.label) {
        return true;
    }

    match record.kind {
        // Flat contacts keep their title in `description`.
        RecordKind::Contact => {
            record.email.as_deref().is_some_and(hit)
                || record.description.as_deref().is_some_and(hit)
        }
        RecordKind::Task => record.description.as_deref().is_some_and(hit),
        _ => {
            record.status.as_deref().is_some_and(hit)
                || record.next_action_date.as_deref().is_some_and(hit)
                || record.contacts.iter().any(|c| hit(&c.name))
        }
    }
}

fn matches_mine(record: &Record, only_mine: bool, current_user: Option<&str>) -> bool {
    if !only_mine {
        return true;
    }
    match current_user {
        Some(user) => record.assignee.as_deref() == Some(user),
        None => false,
    }
}

fn matches_overdue(record: &Record, overdue_only: bool, today: &str) -> bool {
    !overdue_only || record.is_overdue(today)
}
