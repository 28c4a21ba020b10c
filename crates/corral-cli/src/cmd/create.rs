//! `crl create` — create a record through the store.

use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;
use std::str::FromStr;

use corral_core::error::CrmError;
use corral_core::{Priority, Record, RecordKind};

use crate::output::{render_error, render_success, CliError, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "Create a record",
    after_help = "EXAMPLES:\n    # A customer account\n    crl create --kind customer --label \"Acme Corp\"\n\n\
                  # A contact\n    crl create --kind contact --label \"Dana Hill\" --email d@acme.example\n\n\
                  # Machine-readable output\n    crl create --kind task --label \"Send deck\" --json"
)]
pub struct CreateArgs {
    /// Record kind: investor, customer, partner, contact, task.
    #[arg(long)]
    pub kind: String,

    /// Display label: company name, contact name, or task text.
    #[arg(long)]
    pub label: String,

    /// Priority: low, medium, high.
    #[arg(long)]
    pub priority: Option<String>,

    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Next-action date, YYYY-MM-DD.
    #[arg(long)]
    pub next_action: Option<String>,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    // Validation before any store call; a failed row mutates nothing.
    let kind = RecordKind::from_str(&args.kind)?;
    let priority = args
        .priority
        .as_deref()
        .map(Priority::from_str)
        .transpose()?;
    if args.label.trim().is_empty() {
        let err = CrmError::MissingField { field: "label" };
        render_error(output, &CliError::from(&err))?;
        bail!(err);
    }
    if kind == RecordKind::Contact && args.email.as_deref().is_none_or(|e| e.trim().is_empty()) {
        let err = CrmError::MissingField { field: "email" };
        render_error(output, &CliError::from(&err))?;
        bail!(err);
    }

    let record = Record {
        kind,
        label: args.label.clone(),
        priority,
        email: args.email.clone(),
        phone: args.phone.clone(),
        next_action_date: args.next_action.clone(),
        ..Record::default()
    };

    let mut store = JsonStore::load(project_root)?;
    let outcome = corral_core::actions::CrmStore::create_item(&mut store, kind, &record);
    if !outcome.success {
        let message = outcome.message.unwrap_or_else(|| "create rejected".into());
        render_error(output, &CliError::new(message.clone()))?;
        bail!(message);
    }
    store.save()?;

    let id = outcome.id.unwrap_or_default();
    render_success(output, &format!("created {id}"))
}

#[cfg(test)]
mod tests {
    use super::CreateArgs;

    #[test]
    fn create_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CreateArgs,
        }
        let w = Wrapper::parse_from([
            "test", "--kind", "contact", "--label", "Dana", "--email", "d@x.example",
        ]);
        assert_eq!(w.args.kind, "contact");
        assert_eq!(w.args.email.as_deref(), Some("d@x.example"));
    }
}
