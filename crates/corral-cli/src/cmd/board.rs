//! `crl board` — kanban view grouped by status.

use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::Path;

use corral_core::config::load_project_config;
use corral_core::view::{derive_view, group_by_status, FilterContext, SortState, StatusColumn};

use crate::cmd::FilterArgs;
use crate::output::{render, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "Show the kanban board grouped by status",
    long_about = "Group the current filtered view into the configured status \
                  columns. Records whose status matches no column are not shown.",
    after_help = "EXAMPLES:\n    # Full board\n    crl board\n\n\
                  # Board for one category\n    crl board --category customerTasks\n\n\
                  # Machine-readable output\n    crl board --json"
)]
pub struct BoardArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_board(args: &BoardArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let store = JsonStore::load(project_root)?;

    let filter_state = args.filter.to_state()?;
    let ctx = FilterContext::for_today(config.user.current_user);
    let view = derive_view(
        store.records(),
        &filter_state,
        &SortState::default(),
        &ctx,
    );

    let columns: Vec<&str> = config.view.board_columns.iter().map(String::as_str).collect();
    let board = group_by_status(&view, &columns);
    render(output, &board, render_human)
}

fn render_human(board: &Vec<StatusColumn>, w: &mut dyn Write) -> std::io::Result<()> {
    for column in board {
        writeln!(w, "{} ({})", column.status, column.records.len())?;
        for record in &column.records {
            writeln!(w, "  {:<10} {}", record.id, record.label)?;
        }
    }
    Ok(())
}
