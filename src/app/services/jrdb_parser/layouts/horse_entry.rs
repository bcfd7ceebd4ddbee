//! Horse-entry layout (KYF / KYG / KYH, 競走馬データ)
//!
//! The odds/popularity/bracket/weight block (offsets 101-140) was mapped from
//! sample files rather than the published layout and is provisional.

use chrono::{DateTime, Utc};

use super::require_length;
use crate::app::models::{HorseResultRecord, Layout};
use crate::app::services::jrdb_parser::field_parsers::{FixedWidthLine, Span};
use crate::app::services::jrdb_parser::race_key::RaceKey;
use crate::error::DecodeError;

pub const RACE_KEY: Span = Span::new(0, 8);
pub const HORSE_NUMBER: Span = Span::new(8, 10);
pub const HORSE_ID: Span = Span::new(10, 18);
pub const HORSE_NAME: Span = Span::new(18, 54);
pub const IDM: Span = Span::new(54, 59);
pub const JOCKEY_INDEX: Span = Span::new(59, 64);
pub const INFO_INDEX: Span = Span::new(64, 69);
pub const TOTAL_INDEX: Span = Span::new(69, 74);
pub const PACE_TYPE: Span = Span::new(74, 75);
pub const DISTANCE_APTITUDE: Span = Span::new(75, 76);
pub const BASE_ODDS: Span = Span::new(101, 106);
pub const POPULARITY: Span = Span::new(106, 108);
pub const BRACKET_NUMBER: Span = Span::new(115, 116);
pub const WEIGHT_CARRIED: Span = Span::new(137, 140);
pub const JOCKEY_CODE: Span = Span::new(165, 170);
pub const JOCKEY_NAME: Span = Span::new(170, 182);
pub const TRAINER_CODE: Span = Span::new(182, 187);
pub const TRAINER_NAME: Span = Span::new(187, 199);

pub fn decode(text: &str, now: DateTime<Utc>) -> Result<HorseResultRecord, DecodeError> {
    let line = FixedWidthLine::new(text);
    require_length(Layout::HorseEntry, &line)?;

    let key = RaceKey::parse(line.text(RACE_KEY))?;

    Ok(HorseResultRecord {
        race_id: key.key,
        horse_id: line.string(HORSE_ID),
        horse_name: line.name(HORSE_NAME),
        bracket_number: line.int(BRACKET_NUMBER),
        horse_number: line.int(HORSE_NUMBER),
        // Result fields arrive with the race-result feed
        finish_position: None,
        abnormal_code: None,
        finish_time: None,
        first_3f_time: None,
        last_3f_time: None,
        passing_order: None,
        odds: line.float(BASE_ODDS),
        popularity: line.int(POPULARITY),
        weight: line.tenths(WEIGHT_CARRIED),
        jockey_id: line.string(JOCKEY_CODE),
        jockey_name: line.name(JOCKEY_NAME),
        trainer_id: line.string(TRAINER_CODE),
        trainer_name: line.name(TRAINER_NAME),
        horse_weight: None,
        horse_weight_diff: None,
        prize_money: None,
        idm: line.float(IDM),
        jockey_index: line.float(JOCKEY_INDEX),
        info_index: line.float(INFO_INDEX),
        total_index: line.float(TOTAL_INDEX),
        race_pace: line.string(PACE_TYPE),
        horse_pace: line.string(DISTANCE_APTITUDE),
        created_at: now,
        updated_at: now,
    })
}
