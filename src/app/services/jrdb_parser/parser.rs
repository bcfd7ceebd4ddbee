//! File-level dispatch for JRDB feeds
//!
//! Selects the layout decoder from the format tag, decodes every non-blank
//! line independently and collects the survivors. A bad line is logged with
//! its line number and dropped; nothing here fails the whole file.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::layouts::decode_line_at;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::{FormatTag, Record};

/// Line decoder bound to one format tag
#[derive(Debug, Clone, Copy)]
pub struct JrdbParser {
    tag: FormatTag,
}

impl JrdbParser {
    pub fn new(tag: FormatTag) -> Self {
        Self { tag }
    }

    /// Parser for a textual tag, `None` when the tag has no layout
    pub fn for_tag(tag: &str) -> Option<Self> {
        tag.parse::<FormatTag>().ok().map(Self::new)
    }

    pub fn tag(&self) -> FormatTag {
        self.tag
    }

    /// Decode every line of already-decoded file content
    pub fn parse_content(&self, content: &str) -> ParseResult {
        self.parse_content_at(content, Utc::now())
    }

    /// Decode with an explicit processing time shared by all records
    pub fn parse_content_at(&self, content: &str, now: DateTime<Utc>) -> ParseResult {
        let layout = self.tag.layout();
        let mut stats = ParseStats::new();
        let mut records = Vec::new();

        for (index, raw_line) in content.split('\n').enumerate() {
            let line_number = index + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            stats.total_lines += 1;

            if line.trim().is_empty() {
                stats.blank_lines += 1;
                continue;
            }

            match decode_line_at(layout, line, now) {
                Ok(record) => {
                    records.push(record);
                    stats.records_parsed += 1;
                }
                Err(e) => {
                    stats.lines_skipped += 1;
                    warn!("{} line {}: {}", self.tag, line_number, e);
                    stats.errors.push(format!("Line {}: {}", line_number, e));
                }
            }
        }

        info!(
            "Parsed {} {} records from {} lines ({} skipped, {} blank)",
            stats.records_parsed,
            self.tag,
            stats.total_lines,
            stats.lines_skipped,
            stats.blank_lines
        );

        ParseResult { records, stats }
    }
}

/// Decode file content for a tag and return the records with statistics
///
/// An unknown tag yields an empty result and a warning.
pub fn parse_content(content: &str, tag: &str) -> ParseResult {
    match JrdbParser::for_tag(tag) {
        Some(parser) => parser.parse_content(content),
        None => {
            warn!("No parser registered for format tag '{}'", tag);
            ParseResult::empty()
        }
    }
}

/// Decode file content for a tag, keeping only the records
pub fn parse_file(content: &str, tag: &str) -> Vec<Record> {
    parse_content(content, tag).records
}
