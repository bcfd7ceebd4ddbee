//! Horse extended-stats layout (KKA, 競走馬拡張データ)
//!
//! After the race key and horse number the record is 23 back-to-back
//! finish-count groups, each labelled by its position, followed by sire and
//! dam-sire progeny rates.

use chrono::{DateTime, Utc};

use super::require_length;
use crate::app::models::{HorseStatsRecord, Layout, StatGroup};
use crate::app::services::jrdb_parser::field_parsers::{FixedWidthLine, Span};
use crate::app::services::jrdb_parser::finish_counts::{GROUP_WIDTH, decode_counts};
use crate::app::services::jrdb_parser::race_key::RaceKey;
use crate::error::DecodeError;

pub const RACE_KEY: Span = Span::new(0, 8);
pub const HORSE_NUMBER: Span = Span::new(8, 10);
pub const GROUPS_START: usize = 10;

/// Group labels in record order
pub const GROUP_LABELS: [&str; 23] = [
    "jra",
    "exchange",
    "other",
    "surface",
    "surface_distance",
    "track_distance",
    "rotation",
    "direction",
    "jockey",
    "good_track",
    "slightly_heavy_track",
    "heavy_track",
    "slow_pace",
    "middle_pace",
    "high_pace",
    "season",
    "bracket",
    "jockey_distance",
    "jockey_track_distance",
    "jockey_trainer",
    "jockey_owner",
    "jockey_blinker",
    "trainer_owner",
];

pub const SIRE_TURF_TOP2_RATE: Span = Span::new(286, 289);
pub const SIRE_DIRT_TOP2_RATE: Span = Span::new(289, 292);
pub const SIRE_TOP2_AVG_DISTANCE: Span = Span::new(292, 296);
pub const DAM_SIRE_TURF_TOP2_RATE: Span = Span::new(296, 299);
pub const DAM_SIRE_DIRT_TOP2_RATE: Span = Span::new(299, 302);
pub const DAM_SIRE_TOP2_AVG_DISTANCE: Span = Span::new(302, 306);

/// Span of the `index`-th finish-count group
pub const fn group_span(index: usize) -> Span {
    let start = GROUPS_START + index * GROUP_WIDTH;
    Span::new(start, start + GROUP_WIDTH)
}

pub fn decode(text: &str, now: DateTime<Utc>) -> Result<HorseStatsRecord, DecodeError> {
    let line = FixedWidthLine::new(text);
    require_length(Layout::HorseStats, &line)?;

    let key = RaceKey::parse(line.text(RACE_KEY))?;

    let groups = GROUP_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| StatGroup {
            label,
            counts: decode_counts(line.at(group_span(index))),
        })
        .collect();

    Ok(HorseStatsRecord {
        race_id: key.key,
        horse_number: line.int(HORSE_NUMBER),
        groups,
        sire_turf_top2_rate: line.int(SIRE_TURF_TOP2_RATE),
        sire_dirt_top2_rate: line.int(SIRE_DIRT_TOP2_RATE),
        sire_top2_avg_distance: line.int(SIRE_TOP2_AVG_DISTANCE),
        dam_sire_turf_top2_rate: line.int(DAM_SIRE_TURF_TOP2_RATE),
        dam_sire_dirt_top2_rate: line.int(DAM_SIRE_DIRT_TOP2_RATE),
        dam_sire_top2_avg_distance: line.int(DAM_SIRE_TOP2_AVG_DISTANCE),
        created_at: now,
        updated_at: now,
    })
}
