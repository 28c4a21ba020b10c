//! `crl export` — CSV export of the filtered view.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use corral_core::config::load_project_config;
use corral_core::csv::{account_row, contact_row, to_csv, ACCOUNT_COLUMNS, CONTACT_COLUMNS};
use corral_core::view::{filter, FilterContext};
use corral_core::RecordKind;

use crate::cmd::FilterArgs;
use crate::output::{render_success, OutputMode};
use crate::store::JsonStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Accounts,
    Contacts,
}

#[derive(Args, Debug)]
#[command(
    about = "Export records as CSV",
    long_about = "Export the filtered view as CSV. Fields containing commas, \
                  quotes, or newlines are quoted with internal quotes doubled.",
    after_help = "EXAMPLES:\n    # All accounts to stdout\n    crl export accounts\n\n\
                  # Contacts to a file\n    crl export contacts --output contacts.csv"
)]
pub struct ExportArgs {
    /// What to export.
    #[arg(value_enum)]
    pub kind: ExportKind,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run_export(args: &ExportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let store = JsonStore::load(project_root)?;

    let filter_state = args.filter.to_state()?;
    let ctx = FilterContext::for_today(config.user.current_user);
    let view = filter(store.records(), &filter_state, &ctx);

    let csv = match args.kind {
        ExportKind::Accounts => {
            let rows: Vec<Vec<String>> = view
                .iter()
                .filter(|r| r.kind.is_crm_item())
                .map(account_row)
                .collect();
            to_csv(&ACCOUNT_COLUMNS, &rows)
        }
        ExportKind::Contacts => {
            let rows: Vec<Vec<String>> = view
                .iter()
                .filter(|r| r.kind == RecordKind::Contact)
                .map(contact_row)
                .collect();
            to_csv(&CONTACT_COLUMNS, &rows)
        }
    };

    match args.output.as_ref() {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            render_success(output, &format!("exported to {}", path.display()))
        }
        None => {
            print!("{csv}");
            Ok(())
        }
    }
}
