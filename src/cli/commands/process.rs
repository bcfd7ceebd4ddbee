//! Process command implementation
//!
//! Discovers feed files under the input directory, processes them
//! concurrently into the NDJSON sink and reports a summary. Individual file
//! failures never abort the run; they are counted and reported at the end.

use super::shared::{ProcessingStats, create_progress_bar, setup_logging};
use crate::app::services::file_processor::{
    FileOutcome, FileStatus, discover_files, process_file_as, source_name,
};
use crate::app::services::load_target::LoadTarget;
use crate::app::services::ndjson_sink::NdjsonSink;
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::config::ParserConfig;
use crate::constants::MAX_REPORTED_ERRORS;
use crate::{JrdbError, Result};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::HumanDuration;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Process command runner
///
/// 1. Set up logging and layered configuration
/// 2. Discover feed files
/// 3. Process files concurrently with progress reporting
/// 4. Summarize outcomes
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(&args.logging)?;
    info!("Starting JRDB feed processing");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.build_config()?;
    debug!("Loaded configuration: {:?}", config);

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        JrdbError::io(
            format!("Failed to create output directory {}", config.output_dir.display()),
            e,
        )
    })?;

    let files = discover_files(&args.input, &config)?;
    info!(
        "Discovered {} feed files in {}",
        files.len(),
        args.input.display()
    );
    if files.is_empty() {
        warn!(
            "No *.{} feed files found in {}",
            config.normalized_extension(),
            args.input.display()
        );
    }

    let sink = Arc::new(NdjsonSink::new(config.output_dir.clone()));
    let outcomes = process_all(
        files,
        &args.input,
        &config,
        &sink,
        args.logging.show_progress(),
    )
    .await?;

    let mut stats = summarize(&outcomes, &config, &sink);
    stats.processing_time = start_time.elapsed();

    match args.output_format {
        OutputFormat::Human => {
            if !args.logging.quiet {
                print_summary(&outcomes, &stats, &config);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": stats,
                "processing_time_secs": stats.processing_time.as_secs_f64(),
                "files": outcomes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            println!("file,status,tag,table,records_processed,lines_skipped,error");
            for outcome in &outcomes {
                println!(
                    "{},{},{},{},{},{},\"{}\"",
                    outcome.file.display(),
                    outcome.status.as_str(),
                    outcome.tag.as_deref().unwrap_or(""),
                    outcome.table.unwrap_or(""),
                    outcome.records_processed,
                    outcome.stats.as_ref().map_or(0, |s| s.lines_skipped),
                    outcome.error.as_deref().unwrap_or("").replace('"', "\"\"")
                );
            }
        }
    }

    Ok(stats)
}

/// Run `process_file_as` over every file with at most `config.workers` in flight
///
/// Each file loads under its path relative to `input_root`, so equal file
/// names in different directories land in different outputs.
async fn process_all(
    files: Vec<PathBuf>,
    input_root: &Path,
    config: &ParserConfig,
    sink: &Arc<NdjsonSink>,
    show_progress: bool,
) -> Result<Vec<FileOutcome>> {
    let progress = show_progress.then(|| create_progress_bar(files.len() as u64, "Processing files"));

    let mut tasks = stream::iter(files)
        .map(|path| {
            let config = config.clone();
            let sink = Arc::clone(sink);
            let source = source_name(&path, input_root);
            tokio::spawn(
                async move { process_file_as(&path, &source, &config, sink.as_ref()).await },
            )
        })
        .buffer_unordered(config.workers.max(1));

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.next().await {
        let outcome = joined.map_err(|e| {
            JrdbError::processing_interrupted(format!("File worker failed: {}", e))
        })?;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        outcomes.push(outcome);
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Processing complete");
    }

    outcomes.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(outcomes)
}

/// Fold per-file outcomes into run statistics
pub fn summarize(
    outcomes: &[FileOutcome],
    config: &ParserConfig,
    sink: &NdjsonSink,
) -> ProcessingStats {
    let mut stats = ProcessingStats {
        files_processed: outcomes.len(),
        ..Default::default()
    };

    for outcome in outcomes {
        stats.records_processed += outcome.records_processed;
        stats.lines_skipped += outcome.stats.as_ref().map_or(0, |s| s.lines_skipped);

        match outcome.status {
            FileStatus::Success => {
                stats.files_succeeded += 1;
                if let Some(output) = output_file(outcome, sink) {
                    if let Ok(metadata) = std::fs::metadata(&output) {
                        stats
                            .output_sizes
                            .push((output.display().to_string(), metadata.len()));
                    }
                }
            }
            FileStatus::Skipped | FileStatus::Unsupported => stats.files_skipped += 1,
            FileStatus::Empty => {
                stats.files_empty += 1;
                if config.fail_on_empty {
                    stats.errors_encountered += 1;
                }
            }
            FileStatus::Failed => {
                stats.files_failed += 1;
                stats.errors_encountered += 1;
                error!(
                    "Failed to process {}: {}",
                    outcome.file.display(),
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    stats
}

fn output_file(outcome: &FileOutcome, sink: &NdjsonSink) -> Option<PathBuf> {
    let target = outcome
        .tag
        .as_deref()
        .and_then(LoadTarget::for_tag)?;
    Some(sink.table_file(&target, outcome.source.as_deref()?))
}

fn print_summary(outcomes: &[FileOutcome], stats: &ProcessingStats, config: &ParserConfig) {
    println!();
    println!("{}", "Processing Summary".bold());
    println!("  Files processed:   {}", stats.files_processed);
    println!(
        "  Succeeded:         {}",
        stats.files_succeeded.to_string().green()
    );
    if stats.files_skipped > 0 {
        println!(
            "  Skipped:           {}",
            stats.files_skipped.to_string().yellow()
        );
    }
    if stats.files_empty > 0 {
        let count = stats.files_empty.to_string();
        let count = if config.fail_on_empty {
            count.red()
        } else {
            count.yellow()
        };
        println!("  Empty:             {}", count);
    }
    if stats.files_failed > 0 {
        println!(
            "  Failed:            {}",
            stats.files_failed.to_string().red()
        );
    }
    println!("  Records loaded:    {}", stats.records_processed);
    println!("  Lines skipped:     {}", stats.lines_skipped);
    println!(
        "  Output:            {} in {}",
        ProcessingStats::format_size(stats.total_output_size()),
        config.output_dir.display()
    );
    println!(
        "  Elapsed:           {}",
        HumanDuration(stats.processing_time)
    );

    let problems: Vec<&FileOutcome> = outcomes
        .iter()
        .filter(|outcome| {
            outcome.status == FileStatus::Failed
                || (config.fail_on_empty && outcome.status == FileStatus::Empty)
        })
        .collect();
    if !problems.is_empty() {
        println!();
        println!("{}", "Errors".red().bold());
        for outcome in problems.iter().take(MAX_REPORTED_ERRORS) {
            println!(
                "  {}: {}",
                outcome.file.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        if problems.len() > MAX_REPORTED_ERRORS {
            println!("  ... and {} more", problems.len() - MAX_REPORTED_ERRORS);
        }
    }
}
