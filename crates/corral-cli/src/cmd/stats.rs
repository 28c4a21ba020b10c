//! `crl stats` — summary analytics over the filtered view.

use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::Path;

use corral_core::config::load_project_config;
use corral_core::view::{compute_analytics, filter, Analytics, FilterContext};

use crate::cmd::FilterArgs;
use crate::output::{render, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "Summary analytics over the filtered view",
    after_help = "EXAMPLES:\n    # Whole snapshot\n    crl stats\n\n\
                  # One category\n    crl stats --category investor\n\n\
                  # Machine-readable output\n    crl stats --json"
)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_stats(args: &StatsArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let store = JsonStore::load(project_root)?;

    let filter_state = args.filter.to_state()?;
    let ctx = FilterContext::for_today(config.user.current_user);
    let view = filter(store.records(), &filter_state, &ctx);

    let analytics = compute_analytics(&view, &ctx.today);
    render(output, &analytics, render_human)
}

fn render_human(a: &Analytics, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "total:           {}", a.total)?;
    writeln!(w, "high priority:   {}", a.high_priority)?;
    writeln!(w, "overdue:         {}", a.overdue)?;
    writeln!(w, "total value:     {}", a.total_value)?;
    writeln!(w, "with contacts:   {}", a.with_contacts)?;
    writeln!(w, "avg contacts:    {:.1}", a.avg_contacts)?;
    Ok(())
}
