//! Race-result layout (SEC / SED, 成績データ)

use chrono::{DateTime, Utc};

use super::require_length;
use crate::app::models::{HorseResultRecord, Layout};
use crate::app::services::jrdb_parser::field_parsers::{
    FixedWidthLine, Span, parse_race_time, positive_int,
};
use crate::app::services::jrdb_parser::race_key::RaceKey;
use crate::error::DecodeError;

pub const RACE_KEY: Span = Span::new(0, 8);
pub const HORSE_NUMBER: Span = Span::new(8, 10);
pub const HORSE_ID: Span = Span::new(10, 18);
pub const HORSE_NAME: Span = Span::new(26, 62);
pub const FINISH_POSITION: Span = Span::new(140, 142);
pub const ABNORMAL_CODE: Span = Span::new(142, 143);
pub const FINISH_TIME: Span = Span::new(143, 147);
pub const WEIGHT_CARRIED: Span = Span::new(147, 150);
pub const JOCKEY_NAME: Span = Span::new(150, 162);
pub const TRAINER_NAME: Span = Span::new(162, 174);
pub const ODDS: Span = Span::new(174, 180);
pub const POPULARITY: Span = Span::new(180, 182);
pub const IDM: Span = Span::new(182, 185);
pub const RACE_PACE: Span = Span::new(221, 222);
pub const HORSE_PACE: Span = Span::new(222, 223);
pub const FIRST_3F_TIME: Span = Span::new(258, 261);
pub const LAST_3F_TIME: Span = Span::new(261, 264);
pub const CORNER_POSITIONS: [Span; 4] = [
    Span::new(308, 310),
    Span::new(310, 312),
    Span::new(312, 314),
    Span::new(314, 316),
];
pub const JOCKEY_CODE: Span = Span::new(322, 327);
pub const TRAINER_CODE: Span = Span::new(327, 332);
pub const HORSE_WEIGHT: Span = Span::new(332, 335);
pub const HORSE_WEIGHT_DIFF: Span = Span::new(335, 338);
pub const PRIZE_MONEY: Span = Span::new(355, 360);

pub fn decode(text: &str, now: DateTime<Utc>) -> Result<HorseResultRecord, DecodeError> {
    let line = FixedWidthLine::new(text);
    require_length(Layout::RaceResult, &line)?;

    let key = RaceKey::parse(line.text(RACE_KEY))?;
    let abnormal_code = line.string(ABNORMAL_CODE);

    Ok(HorseResultRecord {
        race_id: key.key,
        horse_id: line.string(HORSE_ID),
        horse_name: line.name(HORSE_NAME),
        // Brackets and pre-race indices come from the entry feed
        bracket_number: None,
        horse_number: line.int(HORSE_NUMBER),
        finish_position: positive_int(line.at(FINISH_POSITION)),
        abnormal_code: Some(abnormal_code)
            .filter(|code| !code.is_empty() && code.as_str() != "0"),
        finish_time: parse_race_time(line.at(FINISH_TIME)),
        first_3f_time: line.tenths(FIRST_3F_TIME),
        last_3f_time: line.tenths(LAST_3F_TIME),
        passing_order: passing_order(&line),
        odds: line.float(ODDS),
        popularity: line.int(POPULARITY),
        weight: line.tenths(WEIGHT_CARRIED),
        jockey_id: line.string(JOCKEY_CODE),
        jockey_name: line.name(JOCKEY_NAME),
        trainer_id: line.string(TRAINER_CODE),
        trainer_name: line.name(TRAINER_NAME),
        horse_weight: line.int(HORSE_WEIGHT),
        horse_weight_diff: line.signed(HORSE_WEIGHT_DIFF),
        prize_money: line.int(PRIZE_MONEY),
        idm: line.float(IDM),
        jockey_index: None,
        info_index: None,
        total_index: None,
        race_pace: line.string(RACE_PACE),
        horse_pace: line.string(HORSE_PACE),
        created_at: now,
        updated_at: now,
    })
}

/// Corner positions joined as `"3-3-2-1"`, skipping corners the race does not have
fn passing_order(line: &FixedWidthLine<'_>) -> Option<String> {
    let corners: Vec<String> = CORNER_POSITIONS
        .iter()
        .filter_map(|span| positive_int(line.at(*span)))
        .map(|position| position.to_string())
        .collect();

    if corners.is_empty() {
        None
    } else {
        Some(corners.join("-"))
    }
}
