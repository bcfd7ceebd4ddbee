//! Application constants for the JRDB parser
//!
//! This module contains configuration defaults, file naming conventions and
//! the numeric ranges used by record quality checks.

// =============================================================================
// File Naming
// =============================================================================

/// Extension of feed files when none is configured
pub const DEFAULT_EXTENSION: &str = "csv";

/// Digits following the format tag in a feed file name (`YYMMDD`)
pub const FILE_DATE_DIGITS: usize = 6;

/// Manifest written next to the per-table output directories
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Extension of per-file record output
pub const OUTPUT_EXTENSION: &str = "ndjson";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Output directory when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Minimum percentage of data lines that must decode for a file to pass
pub const DEFAULT_MIN_SUCCESS_RATE: f64 = 90.0;

/// Error messages kept per file in summaries
pub const MAX_REPORTED_ERRORS: usize = 10;

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_WORKERS: &str = "JRDB_WORKERS";
pub const ENV_EXTENSION: &str = "JRDB_EXTENSION";
pub const ENV_OUTPUT_DIR: &str = "JRDB_OUTPUT_DIR";

// =============================================================================
// Quality Check Ranges
// =============================================================================

/// Inclusive numeric ranges checked on loaded rows
pub mod ranges {
    pub const RACE_NUMBER: (f64, f64) = (1.0, 12.0);
    pub const DISTANCE: (f64, f64) = (800.0, 4000.0);
    pub const NUM_HORSES: (f64, f64) = (1.0, 18.0);
    pub const FINISH_POSITION: (f64, f64) = (1.0, 18.0);
    pub const ODDS: (f64, f64) = (1.0, 10000.0);
    pub const POPULARITY: (f64, f64) = (1.0, 18.0);
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Output file name for the records of one input file
pub fn get_output_filename(file_stem: &str) -> String {
    format!("{}.{}", file_stem, OUTPUT_EXTENSION)
}
