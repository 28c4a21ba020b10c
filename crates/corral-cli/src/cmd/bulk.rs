//! `crl bulk` — batch operations over a selection.
//!
//! Selection comes from explicit `--id` flags or `--all` (the current
//! filtered view). Items are processed sequentially with the configured
//! inter-item delay; a failed item is reported and the batch continues.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use corral_core::actions::{run_bulk, BulkOp, BulkReport};
use corral_core::config::load_project_config;
use corral_core::selection::Selection;
use corral_core::view::{derive_view, FilterContext, SortState};

use crate::cmd::FilterArgs;
use crate::output::{render, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "Run a bulk operation over selected records",
    after_help = "EXAMPLES:\n    # Delete two records\n    crl bulk delete --id rec-1 --id rec-2\n\n\
                  # Tag every overdue record\n    crl bulk tag --tag follow-up --all --overdue\n\n\
                  # Machine-readable report\n    crl bulk delete --id rec-1 --json"
)]
pub struct BulkArgs {
    #[command(subcommand)]
    pub op: BulkCommand,
}

#[derive(Subcommand, Debug)]
pub enum BulkCommand {
    /// Delete the selected records.
    Delete(SelectionArgs),
    /// Append a tag to the selected records.
    Tag(TagArgs),
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Select a record by id (repeatable).
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Select everything in the current filtered view.
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Tag to append.
    #[arg(long)]
    pub tag: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

pub fn run_bulk_cmd(args: &BulkArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let (selection_args, op) = match &args.op {
        BulkCommand::Delete(sel) => (sel, BulkOp::Delete),
        BulkCommand::Tag(tag) => (&tag.selection, BulkOp::Tag(tag.tag.clone())),
    };

    let config = load_project_config(project_root)?;
    let mut store = JsonStore::load(project_root)?;
    let snapshot = store.records().to_vec();

    let mut selection = Selection {
        active: true,
        ..Selection::default()
    };
    if selection_args.all {
        let ctx = FilterContext::for_today(config.user.current_user.clone());
        let view = derive_view(
            &snapshot,
            &selection_args.filter.to_state()?,
            &SortState::default(),
            &ctx,
        );
        selection.select_all(&view);
    } else {
        for id in &selection_args.ids {
            selection.toggle(id);
        }
    }

    if selection.is_empty() {
        bail!("nothing selected: pass --id or --all");
    }

    let selected = selection.materialize(&snapshot);
    let delay = Duration::from_millis(config.bulk.item_delay_ms);
    let report = run_bulk(&mut store, &selected, &op, delay);

    if report.success > 0 {
        store.save()?;
    }
    render(output, &report, render_human)?;

    if report.success == 0 && report.failed > 0 {
        bail!("bulk operation failed for every item");
    }
    Ok(())
}

fn render_human(report: &BulkReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "ok: {}  failed: {}", report.success, report.failed)?;
    for err in &report.errors {
        writeln!(w, "  {}: {}", err.id, err.error)?;
    }
    Ok(())
}
