//! Duplicate detector scenarios over mixed snapshots.

use corral_core::dedup::detect_duplicates;
use corral_core::model::record::{Record, RecordKind};
use proptest::prelude::*;
use std::collections::HashSet;

fn account(id: &str, kind: RecordKind, name: &str) -> Record {
    Record {
        id: id.into(),
        kind,
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
fn acme_and_acme_corp_form_one_group() {
    let records = vec![
        account("1", RecordKind::Customer, "Acme Corp"),
        account("2", RecordKind::Customer, "Acme"),
    ];
    let groups = detect_duplicates(&records);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].records.len(), 2);
}

#[test]
fn crm_item_kinds_match_across_investor_customer_partner() {
    // Company-name rules apply across all three CRM item kinds.
    let records = vec![
        account("1", RecordKind::Investor, "Globex"),
        account("2", RecordKind::Partner, "globex"),
    ];
    let groups = detect_duplicates(&records);
    assert_eq!(groups.len(), 1);
}

#[test]
fn mixed_snapshot_groups_contacts_and_accounts_separately() {
    let records = vec![
        account("a1", RecordKind::Customer, "Initech"),
        contact("c1", "Pat Verma", Some("pat@x.example"), None),
        account("a2", RecordKind::Customer, "Initech LLC"),
        contact("c2", "P. Verma", Some("PAT@x.example"), None),
    ];
    let groups = detect_duplicates(&records);
    assert_eq!(groups.len(), 2);
    for group in &groups {
        let kinds: HashSet<bool> = group.records.iter().map(|r| r.kind.is_crm_item()).collect();
        assert_eq!(kinds.len(), 1, "group mixes contacts with accounts");
    }
}

#[test]
fn detection_runs_on_the_unfiltered_snapshot_order() {
    // The first record in input order seeds the group and appears first.
    let records = vec![
        account("later", RecordKind::Customer, "Acme"),
        account("first", RecordKind::Customer, "Acme Corp"),
    ];
    let groups = detect_duplicates(&records);
    assert_eq!(groups[0].records[0].id, "later");
}

proptest! {
    #[test]
    fn prop_groups_are_disjoint_with_distinct_ids(
        names in prop::collection::vec("[a-c]{1,3}", 0..16),
    ) {
        let records: Vec<Record> = names
            .iter()
            .enumerate()
            .map(|(i, name)| account(&format!("id-{i}"), RecordKind::Customer, name))
            .collect();

        let groups = detect_duplicates(&records);
        let mut seen = HashSet::new();
        for group in &groups {
            prop_assert!(group.records.len() >= 2);
            for record in &group.records {
                prop_assert!(seen.insert(record.id.clone()), "id in two groups");
            }
        }
    }
}
