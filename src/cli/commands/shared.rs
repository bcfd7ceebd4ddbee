//! Shared components for CLI commands
//!
//! Common types and helpers used by more than one command implementation.

use crate::app::models::FormatTag;
use crate::app::services::byte_source::{FeedFileName, read_decoded};
use crate::app::services::jrdb_parser::{JrdbParser, ParseResult};
use crate::cli::args::LoggingArgs;
use crate::constants::DEFAULT_EXTENSION;
use crate::{JrdbError, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Processing statistics for reporting across all commands
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    /// Number of files examined
    pub files_processed: usize,
    /// Files whose records reached the sink
    pub files_succeeded: usize,
    /// Files ignored because of their name or tag
    pub files_skipped: usize,
    /// Files that produced no records
    pub files_empty: usize,
    /// Files that failed to read or load
    pub files_failed: usize,
    /// Number of records decoded
    pub records_processed: usize,
    /// Data lines that could not be decoded
    pub lines_skipped: usize,
    /// Number of errors that should fail the run
    pub errors_encountered: usize,
    /// Total processing time
    #[serde(skip)]
    pub processing_time: std::time::Duration,
    /// Output file sizes in bytes
    pub output_sizes: Vec<(String, u64)>,
}

impl ProcessingStats {
    /// Calculate total output size in bytes
    pub fn total_output_size(&self) -> u64 {
        self.output_sizes.iter().map(|(_, size)| size).sum()
    }

    /// Whether the run should exit with a failure code
    pub fn has_failures(&self) -> bool {
        self.errors_encountered > 0
    }

    /// Format output size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &LoggingArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jrdb_parser={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    // A subscriber may already be installed when commands run in-process
    if result.is_err() {
        debug!("Global subscriber already installed, keeping it");
    }
    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Format tag from an explicit flag, otherwise from the file name
pub fn resolve_tag(file: &Path, format: Option<&str>) -> Result<FormatTag> {
    let tag_text = match format {
        Some(tag) => tag.trim().to_uppercase(),
        None => {
            let extension = file
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or(DEFAULT_EXTENSION);
            FeedFileName::new(extension)?
                .extract_tag(file)
                .ok_or_else(|| JrdbError::InvalidFileName {
                    path: file.to_path_buf(),
                })?
        }
    };

    tag_text
        .parse::<FormatTag>()
        .map_err(|_| JrdbError::unsupported_format(tag_text))
}

/// Read, decode and parse one feed file
pub async fn read_and_parse(file: &Path, format: Option<&str>) -> Result<(FormatTag, ParseResult)> {
    let tag = resolve_tag(file, format)?;
    let decoded = read_decoded(file).await?;
    if decoded.had_replacements {
        warn!("{} contains bytes that could not be decoded", file.display());
    }

    let result = JrdbParser::new(tag).parse_content(&decoded.text);
    Ok((tag, result))
}

/// Print the parse summary for one file to stderr
pub fn print_parse_summary(file: &Path, tag: FormatTag, result: &ParseResult) {
    let stats = &result.stats;
    let rate = format!("{:.1}%", stats.success_rate());
    let rate = if stats.is_successful() {
        rate.green()
    } else {
        rate.yellow()
    };

    eprintln!(
        "{} {} ({}, {})",
        "Parsed".bold(),
        file.display(),
        tag,
        tag.layout().name()
    );
    eprintln!(
        "  {} records from {} lines ({} blank, {} skipped), success rate {}",
        stats.records_parsed.to_string().bold(),
        stats.total_lines,
        stats.blank_lines,
        stats.lines_skipped,
        rate
    );
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}
