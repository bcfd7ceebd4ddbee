//! Command implementations for the JRDB parser CLI
//!
//! Each command lives in its own module; shared helpers and the run
//! statistics type are in `shared`.

pub mod check;
pub mod formats;
pub mod parse;
pub mod process;
pub mod shared;

pub use shared::ProcessingStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler:
/// - `parse`: one file to NDJSON on stdout or a file
/// - `process`: a directory of feeds into per-table output
/// - `check`: quality report for one file
/// - `formats`: supported tags and their tables
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.get_command() {
        Commands::Parse(parse_args) => parse::run_parse(parse_args).await,
        Commands::Process(process_args) => process::run_process(process_args).await,
        Commands::Check(check_args) => check::run_check(check_args).await,
        Commands::Formats(formats_args) => formats::run_formats(formats_args).await,
    }
}
