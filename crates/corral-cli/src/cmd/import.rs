//! `crl import` — CSV contacts import.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

use corral_core::csv::{import_contacts, parse_line, ImportReport, Row};

use crate::output::{render, OutputMode};
use crate::store::JsonStore;

#[derive(Args, Debug)]
#[command(
    about = "Import contacts from a CSV file",
    long_about = "Import contacts row by row. Each row needs name and email; \
                  a company column links (or creates) the parent account. \
                  Failed rows are reported with their 1-indexed row numbers \
                  (header included, so the first data row is row 2) and never \
                  stop the rest of the batch.",
    after_help = "EXAMPLES:\n    # Import a file\n    crl import --input contacts.csv\n\n\
                  # Machine-readable report\n    crl import --input contacts.csv --json"
)]
pub struct ImportArgs {
    /// CSV file with a header row.
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,
}

pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let rows = parse_rows(&raw);

    let mut store = JsonStore::load(project_root)?;
    let snapshot = store.records().to_vec();
    let report = import_contacts(&mut store, &snapshot, &rows);

    if report.success > 0 {
        store.save()?;
    }
    render(output, &report, render_human)
}

/// Split the document into header + data rows under the CSV quoting
/// convention. Blank lines are skipped.
fn parse_rows(raw: &str) -> Vec<Row> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = parse_line(header_line);

    lines
        .map(|line| {
            let fields = parse_line(line);
            headers
                .iter()
                .zip(fields)
                .map(|(h, f)| (h.trim().to_string(), f))
                .collect()
        })
        .collect()
}

fn render_human(report: &ImportReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "imported: {}  failed: {}", report.success, report.failed)?;
    for err in &report.errors {
        writeln!(w, "  row {}: {}", err.row, err.error)?;
    }
    Ok(())
}
