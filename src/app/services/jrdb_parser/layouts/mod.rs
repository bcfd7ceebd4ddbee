//! Per-layout line decoders
//!
//! Each submodule owns the offset table of one JRDB record layout and a pure
//! `decode(line, now)` function. Decoders never panic on short or garbled
//! input: spans are clamped, fields degrade to `None`, and only a too-short
//! line or a malformed key rejects the whole line.

pub mod horse_entry;
pub mod horse_master;
pub mod horse_stats;
pub mod meeting;
pub mod race_program;
pub mod race_result;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::field_parsers::FixedWidthLine;
use crate::app::models::{Layout, Record};
use crate::error::DecodeError;

/// Decode one line, stamping audit timestamps with the current time
pub fn decode_line(layout: Layout, line: &str) -> Result<Record, DecodeError> {
    decode_line_at(layout, line, Utc::now())
}

/// Decode one line with an explicit processing time
pub fn decode_line_at(
    layout: Layout,
    line: &str,
    now: DateTime<Utc>,
) -> Result<Record, DecodeError> {
    match layout {
        Layout::RaceProgram => race_program::decode(line, now).map(Record::RaceInfo),
        Layout::HorseEntry => horse_entry::decode(line, now).map(Record::HorseResult),
        Layout::RaceResult => race_result::decode(line, now).map(Record::HorseResult),
        Layout::HorseMaster => horse_master::decode(line, now).map(Record::Pedigree),
        Layout::HorseStats => horse_stats::decode(line, now).map(Record::HorseStats),
        Layout::Meeting => meeting::decode(line, now).map(Record::Meeting),
    }
}

/// Decode one line, logging and discarding a failure
pub fn decode_or_skip(layout: Layout, line: &str) -> Option<Record> {
    match decode_line(layout, line) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipped {} line: {}", layout, e);
            None
        }
    }
}

/// Reject lines shorter than the layout's documented minimum
pub(crate) fn require_length(layout: Layout, line: &FixedWidthLine<'_>) -> Result<(), DecodeError> {
    let minimum = layout.minimum_length();
    let actual = line.char_len();
    if actual < minimum {
        return Err(DecodeError::TooShort {
            layout,
            minimum,
            actual,
        });
    }
    Ok(())
}
