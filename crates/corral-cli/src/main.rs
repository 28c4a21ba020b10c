#![forbid(unsafe_code)]

mod cmd;
mod output;
mod store;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "corral: CRM record pipeline",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Project directory (defaults to the current directory).
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

/// Help text (about/long_about/after_help examples) lives on each
/// command's Args struct; the variants only carry grouping.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(next_help_heading = "Read")]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Read")]
    Board(cmd::board::BoardArgs),

    #[command(next_help_heading = "Read")]
    Stats(cmd::stats::StatsArgs),

    #[command(next_help_heading = "Read")]
    Dups(cmd::dups::DupsArgs),

    #[command(next_help_heading = "Lifecycle")]
    Create(cmd::create::CreateArgs),

    #[command(next_help_heading = "Lifecycle")]
    Bulk(cmd::bulk::BulkArgs),

    #[command(next_help_heading = "Interoperability")]
    Export(cmd::export::ExportArgs),

    #[command(next_help_heading = "Interoperability")]
    Import(cmd::import::ImportArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CORRAL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "corral=debug,info"
        } else {
            "corral=info,warn"
        })
    });

    let format = env::var("CORRAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = match cli.dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let output = cli.output_mode();

    match cli.command {
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Board(ref args) => cmd::board::run_board(args, output, &project_root),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, &project_root),
        Commands::Dups(ref args) => cmd::dups::run_dups(args, output, &project_root),
        Commands::Create(ref args) => cmd::create::run_create(args, output, &project_root),
        Commands::Bulk(ref args) => cmd::bulk::run_bulk_cmd(args, output, &project_root),
        Commands::Export(ref args) => cmd::export::run_export(args, output, &project_root),
        Commands::Import(ref args) => cmd::import::run_import(args, output, &project_root),
    }
}
