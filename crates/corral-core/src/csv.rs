//! CSV conventions: field escaping, export row mapping, and the contacts
//! import loop.
//!
//! The core only produces and validates row data — writing files and
//! reading uploads stays with the caller. The one convention that must
//! hold everywhere: a field containing a comma, quote, or newline is
//! wrapped in double quotes with internal quotes doubled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::debug;

use crate::actions::CrmStore;
use crate::dedup::normalize_name;
use crate::error::CrmError;
use crate::model::record::{Contact, Record, RecordKind};

/// One parsed CSV row: header name to raw field value.
pub type Row = BTreeMap<String, String>;

/// Export column order for CRM item (account) rows.
pub const ACCOUNT_COLUMNS: [&str; 6] =
    ["company", "status", "priority", "tags", "value", "nextActionDate"];

/// Export column order for contact rows.
pub const CONTACT_COLUMNS: [&str; 4] = ["name", "email", "phone", "title"];

/// Quote-wrap a field iff it contains a comma, quote, or newline; internal
/// quotes are doubled. Everything else passes through untouched.
#[must_use]
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parse one CSV line under the same quoting convention as [`escape_field`].
#[must_use]
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Ordered field mapping for a CRM item row. Absent numeric fields render
/// empty, not `0` — export is a display surface.
#[must_use]
pub fn account_row(record: &Record) -> Vec<String> {
    let value = match (record.check_size, record.deal_value) {
        (None, None) => String::new(),
        _ => format!("{}", record.value()),
    };
    vec![
        record.label.clone(),
        record.status.clone().unwrap_or_default(),
        record.priority.map(|p| p.to_string()).unwrap_or_default(),
        record.tags.join(";"),
        value,
        record.next_action_date.clone().unwrap_or_default(),
    ]
}

/// Ordered field mapping for a contact row.
#[must_use]
pub fn contact_row(record: &Record) -> Vec<String> {
    vec![
        record.label.clone(),
        record.email.clone().unwrap_or_default(),
        record.phone.clone().unwrap_or_default(),
        record.description.clone().unwrap_or_default(),
    ]
}

/// Assemble a full CSV document from a header and escaped rows.
#[must_use]
pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    out
}

/// One failed import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// 1-indexed row number including the header: first data row is 2.
    pub row: usize,
    pub error: String,
    pub data: Row,
}

/// Aggregate outcome of an import batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

fn required<'a>(row: &'a Row, field: &'static str) -> Result<&'a str, CrmError> {
    row.get(field)
        .map(String::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(CrmError::MissingField { field })
}

/// Import contacts row by row against the store.
///
/// Per row: validate required fields (name, email), resolve the parent
/// account by company name against the snapshot — creating it when absent —
/// then create the contact and patch it into the parent's contact
/// sequence. Validation failures and store rejections fail that row only;
/// the loop always runs to the end.
pub fn import_contacts(
    store: &mut dyn CrmStore,
    records: &[Record],
    rows: &[Row],
) -> ImportReport {
    let mut report = ImportReport::default();

    // Parent accounts known so far, by normalized company name. Seeded from
    // the snapshot and extended as the import creates new ones, so two rows
    // naming the same new company share one parent.
    let mut parents: HashMap<String, (String, RecordKind, Vec<Contact>)> = records
        .iter()
        .filter(|r| r.kind.is_crm_item())
        .map(|r| {
            (
                normalize_name(&r.label),
                (r.id.clone(), r.kind, r.contacts.clone()),
            )
        })
        .collect();

    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 2;
        match import_row(store, &mut parents, row) {
            Ok(()) => report.success += 1,
            Err(error) => {
                report.failed += 1;
                report.errors.push(ImportRowError {
                    row: row_number,
                    error,
                    data: row.clone(),
                });
            }
        }
    }

    debug!(
        success = report.success,
        failed = report.failed,
        "contact import finished"
    );
    report
}

fn import_row(
    store: &mut dyn CrmStore,
    parents: &mut HashMap<String, (String, RecordKind, Vec<Contact>)>,
    row: &Row,
) -> Result<(), String> {
    let name = required(row, "name").map_err(|e| e.to_string())?;
    let email = required(row, "email").map_err(|e| e.to_string())?;
    let company = row.get("company").map(String::as_str).map(str::trim);

    // Resolve or create the parent before touching the contact, so a
    // failed parent create leaves no partial mutation behind.
    let parent_key = company
        .filter(|c| !c.is_empty())
        .map(|company| -> Result<String, String> {
            let key = normalize_name(company);
            if !parents.contains_key(&key) {
                let parent = Record {
                    kind: RecordKind::Customer,
                    label: company.to_string(),
                    ..Record::default()
                };
                let outcome = store.create_item(RecordKind::Customer, &parent);
                if !outcome.success {
                    return Err(outcome
                        .message
                        .unwrap_or_else(|| format!("failed to create account '{company}'")));
                }
                let id = outcome.id.unwrap_or_default();
                parents.insert(key.clone(), (id, RecordKind::Customer, Vec::new()));
            }
            Ok(key)
        })
        .transpose()?;

    let contact = Record {
        kind: RecordKind::Contact,
        label: name.to_string(),
        email: Some(email.to_string()),
        phone: row.get("phone").cloned().filter(|p| !p.trim().is_empty()),
        description: row.get("title").cloned().filter(|t| !t.trim().is_empty()),
        ..Record::default()
    };
    let outcome = store.create_item(RecordKind::Contact, &contact);
    if !outcome.success {
        return Err(outcome
            .message
            .unwrap_or_else(|| format!("failed to create contact '{name}'")));
    }
    let contact_id = outcome.id.unwrap_or_default();

    if let Some(key) = parent_key {
        if let Some((parent_id, parent_kind, contacts)) = parents.get_mut(&key) {
            contacts.push(Contact {
                id: contact_id,
                name: name.to_string(),
                email: Some(email.to_string()),
                phone: contact.phone.clone(),
                title: contact.description.clone(),
            });
            let patch = serde_json::json!({ "contacts": contacts });
            let outcome = store.update_item(*parent_kind, parent_id, &patch);
            if !outcome.success {
                return Err(outcome
                    .message
                    .unwrap_or_else(|| "failed to link contact to account".to_string()));
            }
        }
    }

    Ok(())
}
