//! Check command implementation
//!
//! Parses one file and runs the quality checks of the table its tag loads
//! into. Failed error-severity checks make the command fail.

use super::shared::{ProcessingStats, print_parse_summary, read_and_parse, setup_logging};
use crate::app::services::load_target::LoadTarget;
use crate::app::services::quality_check::{CheckResult, QualityChecker, QualityReport, Severity};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::constants::DEFAULT_MIN_SUCCESS_RATE;
use crate::Result;
use colored::Colorize;
use std::time::Instant;
use tracing::{debug, info};

/// Check command runner
pub async fn run_check(args: CheckArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(&args.logging)?;
    debug!("Command line arguments: {:?}", args);
    args.validate()?;

    let (tag, result) = read_and_parse(&args.file, args.format.as_deref()).await?;
    let target = LoadTarget::for_layout(tag.layout());
    let min_success_rate = args.min_success_rate.unwrap_or(DEFAULT_MIN_SUCCESS_RATE);

    let report = QualityChecker::new(target, min_success_rate)
        .with_min_rows(args.min_rows)
        .check(&result.records, &result.stats);
    info!(
        "{}: {}/{} checks passed",
        args.file.display(),
        report.passed_checks(),
        report.total_checks()
    );

    match args.output_format {
        OutputFormat::Human => {
            print_parse_summary(&args.file, tag, &result);
            print_report(target, &report);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": args.file.display().to_string(),
                "tag": tag,
                "table": target.table,
                "parse_stats": result.stats,
                "passing": report.is_passing(),
                "results": report.results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            println!("check_name,table_name,severity,passed,message");
            for check in &report.results {
                println!("{}", csv_row(check));
            }
        }
    }

    Ok(ProcessingStats {
        files_processed: 1,
        records_processed: result.records.len(),
        lines_skipped: result.stats.lines_skipped,
        errors_encountered: report.count(Severity::Error),
        processing_time: start_time.elapsed(),
        ..Default::default()
    })
}

fn print_report(target: LoadTarget, report: &QualityReport) {
    println!();
    println!("{} {}", "Quality checks for".bold(), target.table.bold());
    for check in &report.results {
        let mark = if check.passed {
            "PASS".green()
        } else {
            match check.severity {
                Severity::Error => "FAIL".red(),
                Severity::Warning => "WARN".yellow(),
                Severity::Info => "INFO".blue(),
            }
        };
        println!("  [{}] {:<32} {}", mark, check.check_name, check.message);
    }

    println!();
    let summary = format!(
        "{}/{} checks passed ({} errors, {} warnings, {} info)",
        report.passed_checks(),
        report.total_checks(),
        report.count(Severity::Error),
        report.count(Severity::Warning),
        report.count(Severity::Info)
    );
    if report.is_passing() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}

fn csv_row(check: &CheckResult) -> String {
    format!(
        "{},{},{},{},\"{}\"",
        check.check_name,
        check.table_name,
        check.severity,
        check.passed,
        check.message.replace('"', "\"\"")
    )
}
