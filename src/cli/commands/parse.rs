//! Parse command implementation
//!
//! Decodes one feed file and writes its records as newline-delimited JSON to
//! a file or stdout. Summary and logs go to stderr so stdout stays pipeable.

use super::shared::{ProcessingStats, print_parse_summary, read_and_parse, setup_logging};
use crate::app::models::Record;
use crate::cli::args::ParseArgs;
use crate::{JrdbError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;
use tracing::{debug, info};

/// Parse command runner
pub async fn run_parse(args: ParseArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(&args.logging)?;
    debug!("Command line arguments: {:?}", args);
    args.validate()?;

    let (tag, result) = read_and_parse(&args.file, args.format.as_deref()).await?;

    let written = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| JrdbError::io(format!("Failed to create {}", path.display()), e))?;
            write_records(BufWriter::new(file), &result.records)?;
            info!("Wrote {} records to {}", result.records.len(), path.display());
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            vec![(path.display().to_string(), size)]
        }
        None => {
            let stdout = std::io::stdout();
            write_records(stdout.lock(), &result.records)?;
            Vec::new()
        }
    };

    if !args.logging.quiet {
        print_parse_summary(&args.file, tag, &result);
    }

    Ok(ProcessingStats {
        files_processed: 1,
        files_succeeded: usize::from(!result.records.is_empty()),
        files_empty: usize::from(result.records.is_empty()),
        records_processed: result.records.len(),
        lines_skipped: result.stats.lines_skipped,
        processing_time: start_time.elapsed(),
        output_sizes: written,
        ..Default::default()
    })
}

/// Serialize records one JSON object per line
pub fn write_records<W: Write>(mut writer: W, records: &[Record]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer
            .write_all(b"\n")
            .map_err(|e| JrdbError::io("Failed to write record", e))?;
    }
    writer
        .flush()
        .map_err(|e| JrdbError::io("Failed to flush output", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::jrdb_parser::parse_file;

    #[test]
    fn test_write_records_one_object_per_line() {
        let content = format!("06261101{}\n06261102{}", " ".repeat(92), " ".repeat(92));
        let records = parse_file(&content, "BAA");

        let mut buffer = Vec::new();
        write_records(&mut buffer, &records).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["race_id"], "06261102");
    }

    #[test]
    fn test_write_no_records() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &[]).unwrap();
        assert!(buffer.is_empty());
    }
}
