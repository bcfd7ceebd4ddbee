//! Meeting-condition layout (KAA / KAB, 開催データ)
//!
//! Keyed by the 6-character meeting key rather than a race key. Offsets follow
//! the published KAB layout and are provisional for KAA.

use chrono::{DateTime, Utc};

use super::require_length;
use crate::app::models::{Layout, MeetingRecord};
use crate::app::services::jrdb_parser::code_tables;
use crate::app::services::jrdb_parser::field_parsers::{FixedWidthLine, Span};
use crate::app::services::jrdb_parser::race_key::MeetingKey;
use crate::error::DecodeError;

pub const MEETING_KEY: Span = Span::new(0, 6);
pub const RACE_DATE: Span = Span::new(6, 14);
pub const HELD_CATEGORY: Span = Span::new(14, 15);
pub const WEEKDAY: Span = Span::new(15, 17);
pub const VENUE_LABEL: Span = Span::new(17, 21);
pub const WEATHER_CODE: Span = Span::new(21, 22);
pub const TURF_CONDITION_CODE: Span = Span::new(22, 24);
pub const TURF_CONDITION_INNER: Span = Span::new(24, 25);
pub const TURF_CONDITION_MIDDLE: Span = Span::new(25, 26);
pub const TURF_CONDITION_OUTER: Span = Span::new(26, 27);
pub const TURF_TRACK_BIAS: Span = Span::new(27, 30);
pub const STRAIGHT_BIAS_INNERMOST: Span = Span::new(30, 32);
pub const STRAIGHT_BIAS_INNER: Span = Span::new(32, 34);
pub const STRAIGHT_BIAS_MIDDLE: Span = Span::new(34, 36);
pub const STRAIGHT_BIAS_OUTER: Span = Span::new(36, 38);
pub const STRAIGHT_BIAS_OUTERMOST: Span = Span::new(38, 40);
pub const DIRT_CONDITION_CODE: Span = Span::new(40, 42);
pub const DIRT_CONDITION_INNER: Span = Span::new(42, 43);
pub const DIRT_CONDITION_MIDDLE: Span = Span::new(43, 44);
pub const DIRT_CONDITION_OUTER: Span = Span::new(44, 45);
pub const DIRT_TRACK_BIAS: Span = Span::new(45, 48);
pub const DATA_CATEGORY: Span = Span::new(48, 49);
pub const CONSECUTIVE_DAY: Span = Span::new(49, 51);
pub const TURF_TYPE: Span = Span::new(51, 52);
pub const GRASS_HEIGHT: Span = Span::new(52, 56);
pub const ROLLING_FLAG: Span = Span::new(56, 57);
pub const ANTIFREEZE_FLAG: Span = Span::new(57, 58);
pub const RAINFALL: Span = Span::new(58, 63);

pub fn decode(text: &str, now: DateTime<Utc>) -> Result<MeetingRecord, DecodeError> {
    let line = FixedWidthLine::new(text);
    require_length(Layout::Meeting, &line)?;

    let key = MeetingKey::parse(line.text(MEETING_KEY))?;

    let weather_code = line.string(WEATHER_CODE);
    let turf_condition_code = line.string(TURF_CONDITION_CODE);
    let dirt_condition_code = line.string(DIRT_CONDITION_CODE);

    Ok(MeetingRecord {
        meeting_key: key.key,
        venue_name: code_tables::venue_name(&key.venue_code),
        venue_code: key.venue_code,
        meeting_year: key.year,
        meeting_number: key.meeting_number,
        day_number: key.day_number,
        race_date: line.date(RACE_DATE),
        held_category: line.string(HELD_CATEGORY),
        weekday: line.name(WEEKDAY),
        venue_label: line.name(VENUE_LABEL),
        weather: code_tables::weather(&weather_code),
        weather_code,
        turf_condition: code_tables::track_condition(&turf_condition_code),
        turf_condition_code,
        turf_condition_inner: line.string(TURF_CONDITION_INNER),
        turf_condition_middle: line.string(TURF_CONDITION_MIDDLE),
        turf_condition_outer: line.string(TURF_CONDITION_OUTER),
        turf_track_bias: line.signed(TURF_TRACK_BIAS),
        straight_bias_innermost: line.signed(STRAIGHT_BIAS_INNERMOST),
        straight_bias_inner: line.signed(STRAIGHT_BIAS_INNER),
        straight_bias_middle: line.signed(STRAIGHT_BIAS_MIDDLE),
        straight_bias_outer: line.signed(STRAIGHT_BIAS_OUTER),
        straight_bias_outermost: line.signed(STRAIGHT_BIAS_OUTERMOST),
        dirt_condition: code_tables::track_condition(&dirt_condition_code),
        dirt_condition_code,
        dirt_condition_inner: line.string(DIRT_CONDITION_INNER),
        dirt_condition_middle: line.string(DIRT_CONDITION_MIDDLE),
        dirt_condition_outer: line.string(DIRT_CONDITION_OUTER),
        dirt_track_bias: line.signed(DIRT_TRACK_BIAS),
        data_category: line.string(DATA_CATEGORY),
        consecutive_day: line.int(CONSECUTIVE_DAY),
        turf_type: line.string(TURF_TYPE),
        grass_height: line.float(GRASS_HEIGHT),
        rolling_flag: line.string(ROLLING_FLAG),
        antifreeze_flag: line.string(ANTIFREEZE_FLAG),
        rainfall: line.float(RAINFALL),
        created_at: now,
        updated_at: now,
    })
}
