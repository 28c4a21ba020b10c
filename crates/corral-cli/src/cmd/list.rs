//! `crl list` — the filtered, sorted view.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use corral_core::config::load_project_config;
use corral_core::view::{derive_view, FilterContext};
use corral_core::Record;

use crate::cmd::{FilterArgs, SortArgs};
use crate::output::{render, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "List records with filtering and sorting",
    after_help = "EXAMPLES:\n    # Everything, default sort\n    crl list\n\n\
                  # Overdue high-priority customer records\n    crl list --category customer --priority high --overdue\n\n\
                  # Machine-readable output\n    crl list --json"
)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Maximum records to show.
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct ListRow {
    id: String,
    kind: String,
    label: String,
    status: Option<String>,
    priority: Option<String>,
    value: f64,
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let store = JsonStore::load(project_root)?;

    let filter_state = args.filter.to_state()?;
    let sort_state = args
        .sort
        .to_state(config.view.default_sort, config.view.default_order)?;
    let ctx = FilterContext::for_today(config.user.current_user);

    let mut view = derive_view(store.records(), &filter_state, &sort_state, &ctx);
    view.truncate(args.limit);

    let rows: Vec<ListRow> = view.iter().map(row).collect();
    render(output, &rows, render_human)
}

fn row(record: &Record) -> ListRow {
    ListRow {
        id: record.id.clone(),
        kind: record.kind.to_string(),
        label: record.label.clone(),
        status: record.status.clone(),
        priority: record.priority.map(|p| p.to_string()),
        value: record.value(),
    }
}

fn render_human(rows: &Vec<ListRow>, w: &mut dyn Write) -> std::io::Result<()> {
    if rows.is_empty() {
        writeln!(w, "No records match.")?;
        return Ok(());
    }
    for row in rows {
        writeln!(
            w,
            "{:<10} {:<9} {:<28} {:<12} {}",
            row.id,
            row.kind,
            row.label,
            row.status.as_deref().unwrap_or("-"),
            row.priority.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}
