use anyhow::Context;
use clap::Parser;
use jrdb_parser::cli::{
    args::Args,
    commands::{self, ProcessingStats},
};
use std::process;

fn main() {
    // Environment overrides may come from a local .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    match run(args) {
        Ok(stats) if stats.has_failures() => {
            eprintln!(
                "Finished with {} error(s); see the summary above",
                stats.errors_encountered
            );
            process::exit(2);
        }
        Ok(_stats) => {
            // Stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Run the selected command on a multi-threaded runtime, stopping on Ctrl+C
fn run(args: Args) -> anyhow::Result<ProcessingStats> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    let result: anyhow::Result<ProcessingStats> = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => {
                result.context("Command failed")
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for CTRL+C")?;
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err::<ProcessingStats, _>(jrdb_parser::JrdbError::processing_interrupted(
                    "Processing interrupted by user",
                ))
                .context("Command aborted")
            }
        }
    });
    result
}
