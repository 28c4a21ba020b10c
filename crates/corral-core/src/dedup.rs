//! Near-duplicate detection over the full (unfiltered) snapshot.
//!
//! A single-pass seed sweep, deliberately not transitive closure: the first
//! unprocessed record becomes a seed, collects every later unprocessed
//! record that matches it directly, and the collected records are never
//! reseeded. If A matches B and B matches C but A does not match C, the
//! emitted group is {A, B} and C starts its own sweep. Union-find would
//! merge all three; preserving the sweep keeps groups tight around the
//! seed and was chosen over transitive closure on purpose.
//!
//! O(n²) over the snapshot — fine because detection runs on user demand,
//! not on every view recomputation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::record::{Record, RecordKind};

/// A cluster of 2+ records judged likely-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub records: Vec<Record>,
}

/// Lowercase, trim, and strip everything but word characters and spaces.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}

/// Keep digits only.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Lowercase and trim.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Equal, or one a substring of the other. Empty keys never match.
fn fuzzy_name_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a == b || a.contains(b) || b.contains(a))
}

/// Exact equality on a normalized identity key; empty never matches.
fn key_match(a: Option<&str>, b: Option<&str>, normalize: fn(&str) -> String) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let (na, nb) = (normalize(a), normalize(b));
            !na.is_empty() && na == nb
        }
        _ => false,
    }
}

/// Whether two records look like the same real-world entity.
///
/// Kinds never cross-match: CRM items compare company names, contacts
/// compare email/phone/name, tasks are never duplicates of anything.
#[must_use]
pub fn is_duplicate_pair(a: &Record, b: &Record) -> bool {
    if a.kind.is_crm_item() && b.kind.is_crm_item() {
        return fuzzy_name_match(&normalize_name(&a.label), &normalize_name(&b.label));
    }

    if a.kind == RecordKind::Contact && b.kind == RecordKind::Contact {
        return key_match(a.email.as_deref(), b.email.as_deref(), normalize_email)
            || key_match(a.phone.as_deref(), b.phone.as_deref(), normalize_phone)
            || fuzzy_name_match(&normalize_name(&a.label), &normalize_name(&b.label));
    }

    false
}

/// Sweep the snapshot for duplicate groups.
///
/// Iterates in input order; each unprocessed record seeds a group, pulling
/// in all later unprocessed direct matches. Only groups with 2+ members
/// are emitted, and every member appears in exactly one group.
#[must_use]
pub fn detect_duplicates(records: &[Record]) -> Vec<DuplicateGroup> {
    let mut processed = vec![false; records.len()];
    let mut groups = Vec::new();

    for seed_idx in 0..records.len() {
        if processed[seed_idx] {
            continue;
        }
        processed[seed_idx] = true;

        let seed = &records[seed_idx];
        let mut members = vec![seed.clone()];

        for cand_idx in (seed_idx + 1)..records.len() {
            if processed[cand_idx] {
                continue;
            }
            if is_duplicate_pair(seed, &records[cand_idx]) {
                processed[cand_idx] = true;
                members.push(records[cand_idx].clone());
            }
        }

        if members.len() >= 2 {
            debug!(seed = %seed.id, size = members.len(), "duplicate group");
            groups.push(DuplicateGroup { records: members });
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::{
        detect_duplicates, is_duplicate_pair, normalize_email, normalize_name, normalize_phone,
    };
    use crate::model::record::{Record, RecordKind};

    fn account(id: &str, name: &str) -> Record {
        Record {
            id: id.into(),
            kind: RecordKind::Customer,
            label: name.into(),
            ..Record::default()
        }
    }

    fn contact(id: &str, name: &str, email: Option<&str>, phone: Option<&str>) -> Record {
        Record {
            id: id.into(),
            kind: RecordKind::Contact,
            label: name.into(),
            email: email.map(Into::into),
            phone: phone.map(Into::into),
            ..Record::default()
        }
    }

    #[test]
    fn normalization_rules() {
        assert_eq!(normalize_name("  Acme, Inc.  "), "acme inc");
        assert_eq!(normalize_phone("+1 (555) 010-2030"), "15550102030");
        assert_eq!(normalize_email("  Pat@Example.COM "), "pat@example.com");
    }

    #[test]
    fn substring_company_names_group_together() {
        let records = vec![account("1", "Acme Corp"), account("2", "Acme")];
        let groups = detect_duplicates(&records);
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn contacts_match_on_any_identity_field() {
        let by_email = (
            contact("1", "Pat V", Some("pat@x.example"), None),
            contact("2", "Patricia", Some("PAT@x.example"), None),
        );
        assert!(is_duplicate_pair(&by_email.0, &by_email.1));

        let by_phone = (
            contact("3", "A", None, Some("555-010-2030")),
            contact("4", "B", None, Some("(555) 010 2030")),
        );
        assert!(is_duplicate_pair(&by_phone.0, &by_phone.1));

        let by_name = (
            contact("5", "Dana Hill", None, None),
            contact("6", "dana hill", None, None),
        );
        assert!(is_duplicate_pair(&by_name.0, &by_name.1));
    }

    #[test]
    fn empty_identity_keys_never_match() {
        let a = contact("1", "", None, None);
        let b = contact("2", "", None, None);
        assert!(!is_duplicate_pair(&a, &b));

        let a = contact("3", "X", Some(""), None);
        let b = contact("4", "Y", Some("  "), None);
        assert!(!is_duplicate_pair(&a, &b));
    }

    #[test]
    fn kinds_never_cross_match() {
        let acc = account("1", "Dana Hill");
        let con = contact("2", "Dana Hill", None, None);
        assert!(!is_duplicate_pair(&acc, &con));
    }

    #[test]
    fn groups_have_two_plus_members_with_distinct_ids() {
        let records = vec![
            account("1", "Acme"),
            account("2", "Globex"),
            account("3", "Acme Corp"),
            account("4", "Initech"),
        ];
        let groups = detect_duplicates(&records);
        assert_eq!(groups.len(), 1);
        for group in &groups {
            assert!(group.records.len() >= 2);
            let mut ids: Vec<&str> = group.records.iter().map(|r| r.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), group.records.len());
        }
    }

    #[test]
    fn sweep_is_not_transitive() {
        // "Acme Corporation" matches "Acme" (substring) and "Acme" matches
        // "Acme West" — but the seed sweep only groups direct matches of the
        // seed, so "Corporation" and "West" end up grouped through "Acme"
        // only when each matches the seed itself.
        let records = vec![
            account("1", "Corp"),
            account("2", "Acme Corp"),
            account("3", "Acme"),
        ];
        // Seed "Corp": matches "Acme Corp" (substring). "Acme" does not
        // contain "corp", so it is left for its own sweep and no second
        // group forms.
        let groups = detect_duplicates(&records);
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn no_duplicates_yields_no_groups() {
        let records = vec![account("1", "Acme"), account("2", "Globex")];
        assert!(detect_duplicates(&records).is_empty());
    }
}
