//! `crl dups` — duplicate detection across the full snapshot.
//!
//! Runs over the unfiltered record list: a record hidden by the current
//! filters can still shadow one that is visible.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use corral_core::dedup::detect_duplicates;

use crate::output::{render, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "Find likely-duplicate records",
    long_about = "Scan the full snapshot for likely duplicates: CRM items by \
                  fuzzy company name, contacts by email, phone, or name.",
    after_help = "EXAMPLES:\n    # Scan everything\n    crl dups\n\n\
                  # Limit groups\n    crl dups --limit 10\n\n\
                  # Machine-readable output\n    crl dups --json"
)]
pub struct DupsArgs {
    /// Maximum number of duplicate groups to report.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct GroupOutput {
    ids: Vec<String>,
    labels: Vec<String>,
}

pub fn run_dups(args: &DupsArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let store = JsonStore::load(project_root)?;

    let mut groups = detect_duplicates(store.records());
    if let Some(limit) = args.limit {
        groups.truncate(limit);
    }

    let rendered: Vec<GroupOutput> = groups
        .iter()
        .map(|g| GroupOutput {
            ids: g.records.iter().map(|r| r.id.clone()).collect(),
            labels: g.records.iter().map(|r| r.label.clone()).collect(),
        })
        .collect();

    render(output, &rendered, render_human)
}

fn render_human(groups: &Vec<GroupOutput>, w: &mut dyn Write) -> std::io::Result<()> {
    if groups.is_empty() {
        writeln!(w, "No duplicate groups found.")?;
        return Ok(());
    }
    writeln!(w, "{} duplicate group(s):", groups.len())?;
    for (i, group) in groups.iter().enumerate() {
        writeln!(w, "\n{}.", i + 1)?;
        for (id, label) in group.ids.iter().zip(&group.labels) {
            writeln!(w, "  - {id}  {label}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DupsArgs;

    #[test]
    fn dups_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: DupsArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.limit.is_none());
    }
}
