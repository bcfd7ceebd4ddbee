//! Race-program layout (BAA / BAB / BAC, 番組データ)

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use super::require_length;
use crate::app::models::{Layout, RaceInfoRecord};
use crate::app::services::jrdb_parser::code_tables;
use crate::app::services::jrdb_parser::field_parsers::{FixedWidthLine, Span, safe_int};
use crate::app::services::jrdb_parser::race_key::RaceKey;
use crate::error::DecodeError;

pub const RACE_KEY: Span = Span::new(0, 8);
pub const RACE_DATE: Span = Span::new(8, 16);
pub const START_TIME: Span = Span::new(16, 20);
pub const DISTANCE: Span = Span::new(20, 24);
pub const COURSE_TYPE: Span = Span::new(24, 25);
pub const DIRECTION: Span = Span::new(25, 26);
pub const INNER_OUTER: Span = Span::new(26, 27);
pub const AGE_CONDITION: Span = Span::new(27, 29);
pub const RACE_CONDITION: Span = Span::new(29, 31);
pub const SYMBOL: Span = Span::new(31, 34);
pub const WEIGHT_TYPE: Span = Span::new(34, 35);
pub const GRADE: Span = Span::new(35, 36);
pub const RACE_NAME: Span = Span::new(36, 86);

/// Start of the tail searched for the head count
pub const HEAD_COUNT_TAIL_START: usize = 80;

// The head count has no reliable offset once a full-width race name shifts the
// tail, so it is recovered heuristically: a 1-2 digit number followed by a
// 1-2 digit code and an optional non-numeric short name at the end of the line.
static HEAD_COUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2}) ?([0-9]{1,2})[^0-9]*$").expect("head count pattern is valid")
});

pub fn decode(text: &str, now: DateTime<Utc>) -> Result<RaceInfoRecord, DecodeError> {
    let line = FixedWidthLine::new(text);
    require_length(Layout::RaceProgram, &line)?;

    let key = RaceKey::parse(line.text(RACE_KEY))?;

    let race_condition = line.string(RACE_CONDITION);
    let grade_code = line.string(GRADE);
    let race_class = code_tables::race_class(&grade_code, &race_condition);

    Ok(RaceInfoRecord {
        race_id: key.key.clone(),
        race_date: line.date(RACE_DATE),
        race_year: key.year,
        meeting_number: key.meeting_number,
        day_number: key.day_number,
        venue_name: code_tables::venue_name(&key.venue_code),
        venue_code: key.venue_code,
        race_number: key.race_number,
        race_name: line.name(RACE_NAME),
        start_time: line.string(START_TIME),
        course_type: code_tables::course_type(line.at(COURSE_TYPE)),
        distance: line.int(DISTANCE),
        direction: code_tables::direction(line.at(DIRECTION)),
        inner_outer: line.string(INNER_OUTER),
        race_class,
        grade_code,
        age_condition: line.string(AGE_CONDITION),
        sex_condition: line.string(SYMBOL),
        weight_type: line.string(WEIGHT_TYPE),
        // Not carried by the program feeds; filled from meeting data downstream
        weather: None,
        track_condition: None,
        num_horses: head_count(&line),
        prize_1st: None,
        prize_2nd: None,
        prize_3rd: None,
        created_at: now,
        updated_at: now,
    })
}

/// Best-effort head count from the end of the line
pub fn head_count(line: &FixedWidthLine<'_>) -> Option<i64> {
    if line.char_len() <= HEAD_COUNT_TAIL_START {
        return None;
    }
    let tail = line.tail(HEAD_COUNT_TAIL_START).trim();
    HEAD_COUNT_PATTERN
        .captures(tail)
        .and_then(|captures| captures.get(1))
        .and_then(|count| safe_int(count.as_str(), None))
}
