//! JRDB fixed-width record parser
//!
//! Turns decoded text of a JRDB feed file into typed records. Each line is one
//! record whose fields sit at fixed character offsets; the layout is chosen
//! from the three-letter format tag at the start of the file name.
//!
//! ## Architecture
//!
//! - [`field_parsers`] - Primitive converters and the fixed-width line view
//! - [`code_tables`] - Venue, surface, condition, weather and sex labels
//! - [`race_key`] - Race and meeting key decoding
//! - [`finish_counts`] - The repeated 12-character finish-count group
//! - [`layouts`] - One decoder per record layout
//! - [`parser`] - File-level dispatch and aggregation
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use jrdb_parser::app::services::jrdb_parser::parse_content;
//!
//! let result = parse_content("", "BAA");
//! assert!(result.records.is_empty());
//! assert_eq!(result.stats.blank_lines, 1);
//! ```

pub mod code_tables;
pub mod field_parsers;
pub mod finish_counts;
pub mod layouts;
pub mod parser;
pub mod race_key;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use field_parsers::{FixedWidthLine, Span};
pub use finish_counts::decode_counts;
pub use layouts::{decode_line, decode_line_at, decode_or_skip};
pub use parser::{JrdbParser, parse_content, parse_file};
pub use race_key::{MeetingKey, RaceKey};
pub use stats::{ParseResult, ParseStats};
