//! JRDB Parser Library
//!
//! Decodes the fixed-width record files published by JRDB (Japan Racing
//! Data Bank) into typed, flat records ready for a warehouse load.
//!
//! This library provides tools for:
//! - Converting raw fixed-width fields (integers, tenths, dates, names)
//! - Translating JRA code tables (venues, surfaces, going, weather, sex)
//! - Decoding race and meeting keys with the two-digit year window
//! - Decoding each supported layout, one line at a time
//! - Dispatching whole files by format tag with per-line error isolation
//! - Routing records to their target table and merge keys
//! - Writing newline-delimited JSON per table and checking data quality
//!
//! ```
//! use jrdb_parser::{LoadTarget, parse_file};
//!
//! let line = format!("06261101{}", " ".repeat(92));
//! let records = parse_file(&line, "baa");
//! assert_eq!(records.len(), 1);
//! assert_eq!(LoadTarget::for_tag("BAA").unwrap().table, "race_info");
//! ```

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FormatTag, Layout, Record};
pub use app::services::jrdb_parser::{JrdbParser, ParseResult, ParseStats, parse_content, parse_file};
pub use app::services::load_target::LoadTarget;
pub use config::ParserConfig;
pub use error::{DecodeError, JrdbError, KeyError, Result};
