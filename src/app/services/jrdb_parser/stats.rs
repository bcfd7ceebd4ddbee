//! Parsing statistics and result structures for JRDB feed files
//!
//! Blank lines are tracked apart from rejected lines so that trailing
//! newlines and padding never count against a file's success rate.

use crate::app::models::Record;

/// Parsing result with records and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Successfully decoded records, in input order
    pub records: Vec<Record>,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

impl ParseResult {
    /// Result for a file that could not be dispatched at all
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            stats: ParseStats::new(),
        }
    }
}

/// Simple parsing statistics
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Total number of lines encountered, blank ones included
    pub total_lines: usize,

    /// Lines that were empty or whitespace only
    pub blank_lines: usize,

    /// Number of records successfully decoded
    pub records_parsed: usize,

    /// Number of non-blank lines rejected by the decoder
    pub lines_skipped: usize,

    /// Rejection reasons, prefixed with the 1-based line number
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_lines: 0,
            blank_lines: 0,
            records_parsed: 0,
            lines_skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Lines that carried data
    pub fn data_lines(&self) -> usize {
        self.total_lines - self.blank_lines
    }

    /// Calculate success rate over data lines as a percentage
    pub fn success_rate(&self) -> f64 {
        let data_lines = self.data_lines();
        if data_lines == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / data_lines as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
