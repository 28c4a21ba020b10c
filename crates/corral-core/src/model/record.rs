//! The flat record aggregate and its closed vocabularies.
//!
//! A [`Record`] generalizes the three shapes the pipeline sees: CRM items
//! (investors/customers/partners), flat contacts, and tasks. The kind is an
//! explicit tag resolved at construction time — downstream code never sniffs
//! field presence to guess what it is holding.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::CrmError;

/// The five record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Investor,
    Customer,
    Partner,
    Contact,
    Task,
}

impl RecordKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investor => "investor",
            Self::Customer => "customer",
            Self::Partner => "partner",
            Self::Contact => "contact",
            Self::Task => "task",
        }
    }

    /// Company-level CRM items, as opposed to flat contacts and tasks.
    pub const fn is_crm_item(self) -> bool {
        matches!(self, Self::Investor | Self::Customer | Self::Partner)
    }
}

/// Record priority, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Ordinal used by the sort comparator. Missing priority compares as 0.
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// The closed task lifecycle, one kanban column each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

/// A dated note. The timestamp (epoch milliseconds, assigned at creation)
/// is the stable identity key for edit/delete-by-timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub timestamp: i64,
}

/// A person attached to a CRM item, also addressable as a flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
}

/// All fields the pipeline reads, across every record kind.
///
/// Optional fields absent for a given kind stay `None`; derived accessors
/// treat them as empty/zero rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    /// Primary display label: company name, contact name, or task text.
    pub label: String,
    /// Filter bucket; falls back to the kind name when unset
    /// (e.g. `"customerTasks"` for tasks hanging off customer records).
    pub category: Option<String>,
    /// Free-form for CRM items; for tasks, one of the [`TaskStatus`] strings.
    pub status: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub notes: Vec<Note>,
    /// Only populated on CRM items. The sole source of truth for the
    /// contact-to-account link.
    pub contacts: Vec<Contact>,
    pub assignee: Option<String>,
    pub check_size: Option<f64>,
    pub deal_value: Option<f64>,
    /// `YYYY-MM-DD`; drives the overdue predicate by string comparison.
    pub next_action_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: RecordKind::Task,
            label: String::new(),
            category: None,
            status: None,
            priority: None,
            tags: Vec::new(),
            notes: Vec::new(),
            contacts: Vec::new(),
            assignee: None,
            check_size: None,
            deal_value: None,
            next_action_date: None,
            email: None,
            phone: None,
            description: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Record {
    /// Filter bucket, falling back to the kind name.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(self.kind.as_str())
    }

    /// Numeric value for sorting and analytics totals: `check_size` plus
    /// `deal_value`, absent treated as 0. Display layers that want to show
    /// "no value" must check the raw fields instead.
    pub fn value(&self) -> f64 {
        self.check_size.unwrap_or(0.0) + self.deal_value.unwrap_or(0.0)
    }

    /// Most recent note timestamp; 0 when the record has no notes.
    pub fn last_contact_ts(&self) -> i64 {
        self.notes.iter().map(|n| n.timestamp).max().unwrap_or(0)
    }

    /// Overdue iff a next-action date is present and lexically before
    /// `today` (`YYYY-MM-DD` strings compare correctly byte-wise).
    pub fn is_overdue(&self, today: &str) -> bool {
        self.next_action_date
            .as_deref()
            .is_some_and(|d| d < today)
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

/// Find the CRM item whose embedded `contacts` sequence carries the given
/// contact id. The relation is derived, never stored on the contact; a
/// contact in no sequence is unlinked and `None` is returned.
pub fn linked_account<'a>(records: &'a [Record], contact_id: &str) -> Option<&'a Record> {
    records
        .iter()
        .filter(|r| r.kind.is_crm_item())
        .find(|r| r.contacts.iter().any(|c| c.id == contact_id))
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for RecordKind {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "investor" => Ok(Self::Investor),
            "customer" => Ok(Self::Customer),
            "partner" => Ok(Self::Partner),
            "contact" => Ok(Self::Contact),
            "task" => Ok(Self::Task),
            _ => Err(CrmError::InvalidEnum {
                expected: "kind",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(CrmError::InvalidEnum {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(CrmError::InvalidEnum {
                expected: "task status",
                got: s.to_string(),
            }),
        }
    }
}
