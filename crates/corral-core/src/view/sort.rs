//! Sort comparator.
//!
//! Maps a sort key and direction to a total ordering over records. Sorting
//! always goes through the standard library's stable `sort_by`, so ties
//! keep their input order — repeated filter/sort passes over unchanged
//! data are deterministic and idempotent.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::CrmError;
use crate::model::record::Record;

/// What to sort the view by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Company/contact/task display label, case-insensitive.
    #[default]
    Label,
    /// Priority ordinal (high first when descending); missing priority is 0.
    Priority,
    /// Free-form status string.
    Status,
    /// `check_size` + `deal_value`, absent as 0.
    Value,
    /// Most recent note timestamp, 0 when no notes.
    LastContact,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Value => "value",
            Self::LastContact => "last-contact",
        }
    }
}

impl FromStr for SortKey {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" | "name" | "company" => Ok(Self::Label),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "value" => Ok(Self::Value),
            "last-contact" | "lastcontact" => Ok(Self::LastContact),
            _ => Err(CrmError::InvalidEnum {
                expected: "sort key",
                got: s.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Key + direction, the caller-owned sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

/// Ascending ordering of two records under the given key.
///
/// Equal keys return `Ordering::Equal` and rely on sort stability for the
/// final tie-break (input order).
#[must_use]
pub fn compare(key: SortKey, a: &Record, b: &Record) -> Ordering {
    match key {
        SortKey::Label => a.label.to_lowercase().cmp(&b.label.to_lowercase()),
        SortKey::Priority => {
            let pa = a.priority.map_or(0, |p| p.ordinal());
            let pb = b.priority.map_or(0, |p| p.ordinal());
            pa.cmp(&pb)
        }
        SortKey::Status => a.status.as_deref().unwrap_or("").cmp(b.status.as_deref().unwrap_or("")),
        SortKey::Value => a
            .value()
            .partial_cmp(&b.value())
            .unwrap_or(Ordering::Equal),
        SortKey::LastContact => a.last_contact_ts().cmp(&b.last_contact_ts()),
    }
}

/// Stable in-place sort by key and direction.
///
/// Descending reverses the ascending ordering; `Equal` stays `Equal`, so
/// stability is preserved in both directions.
pub fn sort_records(records: &mut [Record], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord = compare(key, a, b);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{compare, sort_records, SortKey, SortOrder};
    use crate::model::record::{Note, Priority, Record};
    use std::cmp::Ordering;
    use std::str::FromStr;

    fn record(id: &str, label: &str) -> Record {
        Record {
            id: id.into(),
            label: label.into(),
            ..Record::default()
        }
    }

    #[test]
    fn label_sort_is_case_insensitive() {
        let a = record("1", "acme");
        let b = record("2", "Beacon");
        assert_eq!(compare(SortKey::Label, &a, &b), Ordering::Less);
    }

    #[test]
    fn missing_priority_sorts_below_low() {
        let none = record("1", "a");
        let low = Record {
            priority: Some(Priority::Low),
            ..record("2", "b")
        };
        assert_eq!(compare(SortKey::Priority, &none, &low), Ordering::Less);
    }

    #[test]
    fn value_sort_defaults_absent_to_zero() {
        let bare = record("1", "a");
        let funded = Record {
            check_size: Some(1_000_000.0),
            ..record("2", "b")
        };
        assert_eq!(compare(SortKey::Value, &bare, &funded), Ordering::Less);
        assert_eq!(compare(SortKey::Value, &bare, &record("3", "c")), Ordering::Equal);
    }

    #[test]
    fn last_contact_uses_max_note_timestamp() {
        let old = Record {
            notes: vec![Note {
                text: "x".into(),
                timestamp: 10,
            }],
            ..record("1", "a")
        };
        let fresh = Record {
            notes: vec![
                Note {
                    text: "x".into(),
                    timestamp: 5,
                },
                Note {
                    text: "y".into(),
                    timestamp: 50,
                },
            ],
            ..record("2", "b")
        };
        assert_eq!(compare(SortKey::LastContact, &old, &fresh), Ordering::Less);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut records = vec![record("1", "same"), record("2", "same"), record("3", "same")];
        sort_records(&mut records, SortKey::Label, SortOrder::Asc);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        // Descending ties also keep input order.
        sort_records(&mut records, SortKey::Label, SortOrder::Desc);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let mut records = vec![
            Record {
                priority: Some(Priority::High),
                ..record("1", "c")
            },
            record("2", "a"),
            Record {
                priority: Some(Priority::Medium),
                ..record("3", "b")
            },
        ];
        sort_records(&mut records, SortKey::Priority, SortOrder::Desc);
        let once: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        sort_records(&mut records, SortKey::Priority, SortOrder::Desc);
        let twice: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!(SortKey::from_str("company").unwrap(), SortKey::Label);
        assert_eq!(SortKey::from_str("name").unwrap(), SortKey::Label);
        assert_eq!(SortKey::from_str("last-contact").unwrap(), SortKey::LastContact);
        assert!(SortKey::from_str("age").is_err());
    }
}
