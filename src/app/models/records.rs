//! Typed record structures, one per target table
//!
//! Every field a feed may leave blank is an `Option`, serialized as `null`.
//! Fields a layout never carries are still present (always `None`) so that
//! rows bound for the same table share one field set.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Race-level information from the race-program feeds (`race_info`)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RaceInfoRecord {
    pub race_id: String,
    pub race_date: Option<String>,
    pub race_year: i32,
    pub meeting_number: u32,
    pub day_number: u32,
    pub venue_code: String,
    pub venue_name: Option<&'static str>,
    pub race_number: u32,
    pub race_name: String,
    pub start_time: String,
    pub course_type: Option<&'static str>,
    pub distance: Option<i64>,
    pub direction: &'static str,
    pub inner_outer: String,
    pub race_class: String,
    pub grade_code: String,
    pub age_condition: String,
    pub sex_condition: String,
    pub weight_type: String,
    pub weather: Option<&'static str>,
    pub track_condition: Option<&'static str>,
    pub num_horses: Option<i64>,
    pub prize_1st: Option<i64>,
    pub prize_2nd: Option<i64>,
    pub prize_3rd: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-horse row shared by the horse-entry and race-result feeds (`horse_results`)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HorseResultRecord {
    pub race_id: String,
    pub horse_id: String,
    pub horse_name: String,
    pub bracket_number: Option<i64>,
    pub horse_number: Option<i64>,
    pub finish_position: Option<i64>,
    pub abnormal_code: Option<String>,
    pub finish_time: Option<f64>,
    pub first_3f_time: Option<f64>,
    pub last_3f_time: Option<f64>,
    pub passing_order: Option<String>,
    pub odds: Option<f64>,
    pub popularity: Option<i64>,
    pub weight: Option<f64>,
    pub jockey_id: String,
    pub jockey_name: String,
    pub trainer_id: String,
    pub trainer_name: String,
    pub horse_weight: Option<i64>,
    pub horse_weight_diff: Option<i64>,
    pub prize_money: Option<i64>,
    pub idm: Option<f64>,
    pub jockey_index: Option<f64>,
    pub info_index: Option<f64>,
    pub total_index: Option<f64>,
    pub race_pace: String,
    pub horse_pace: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Horse master data (`pedigree`)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PedigreeRecord {
    pub horse_id: String,
    pub horse_name: String,
    pub sex_code: String,
    pub sex: Option<&'static str>,
    pub coat_color_code: String,
    pub horse_symbol_code: String,
    pub sire_name: String,
    pub dam_name: String,
    pub dam_sire_name: String,
    pub birth_date: Option<String>,
    pub owner_name: String,
    pub breeder_name: String,
    pub birthplace: String,
    pub retired_flag: Option<i64>,
    pub data_date: Option<String>,
    pub sire_lineage_code: String,
    pub dam_sire_lineage_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Win / place / show / out-of-money counts from one 12-character group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct FinishCounts {
    pub win: Option<i64>,
    pub place: Option<i64>,
    pub show: Option<i64>,
    pub out: Option<i64>,
}

impl FinishCounts {
    /// Total starts, when every count is known
    pub fn starts(&self) -> Option<i64> {
        Some(self.win? + self.place? + self.show? + self.out?)
    }
}

/// A labelled occurrence of the repeated finish-count group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatGroup {
    pub label: &'static str,
    pub counts: FinishCounts,
}

/// Extended per-horse statistics (`horse_stats`)
///
/// Serializes flat: each group expands to `<label>_win`, `<label>_place`,
/// `<label>_show` and `<label>_out`.
#[derive(Debug, Clone, PartialEq)]
pub struct HorseStatsRecord {
    pub race_id: String,
    pub horse_number: Option<i64>,
    pub groups: Vec<StatGroup>,
    pub sire_turf_top2_rate: Option<i64>,
    pub sire_dirt_top2_rate: Option<i64>,
    pub sire_top2_avg_distance: Option<i64>,
    pub dam_sire_turf_top2_rate: Option<i64>,
    pub dam_sire_dirt_top2_rate: Option<i64>,
    pub dam_sire_top2_avg_distance: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HorseStatsRecord {
    /// Counts for a labelled group
    pub fn group(&self, label: &str) -> Option<&FinishCounts> {
        self.groups
            .iter()
            .find(|group| group.label == label)
            .map(|group| &group.counts)
    }
}

impl Serialize for HorseStatsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(10 + self.groups.len() * 4))?;
        map.serialize_entry("race_id", &self.race_id)?;
        map.serialize_entry("horse_number", &self.horse_number)?;
        for group in &self.groups {
            map.serialize_entry(&format!("{}_win", group.label), &group.counts.win)?;
            map.serialize_entry(&format!("{}_place", group.label), &group.counts.place)?;
            map.serialize_entry(&format!("{}_show", group.label), &group.counts.show)?;
            map.serialize_entry(&format!("{}_out", group.label), &group.counts.out)?;
        }
        map.serialize_entry("sire_turf_top2_rate", &self.sire_turf_top2_rate)?;
        map.serialize_entry("sire_dirt_top2_rate", &self.sire_dirt_top2_rate)?;
        map.serialize_entry("sire_top2_avg_distance", &self.sire_top2_avg_distance)?;
        map.serialize_entry("dam_sire_turf_top2_rate", &self.dam_sire_turf_top2_rate)?;
        map.serialize_entry("dam_sire_dirt_top2_rate", &self.dam_sire_dirt_top2_rate)?;
        map.serialize_entry(
            "dam_sire_top2_avg_distance",
            &self.dam_sire_top2_avg_distance,
        )?;
        map.serialize_entry("created_at", &self.created_at)?;
        map.serialize_entry("updated_at", &self.updated_at)?;
        map.end()
    }
}

/// Meeting-day track and weather conditions (`meeting_info`)
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MeetingRecord {
    pub meeting_key: String,
    pub venue_code: String,
    pub venue_name: Option<&'static str>,
    pub meeting_year: i32,
    pub meeting_number: u32,
    pub day_number: u32,
    pub race_date: Option<String>,
    pub held_category: String,
    pub weekday: String,
    pub venue_label: String,
    pub weather_code: String,
    pub weather: Option<&'static str>,
    pub turf_condition_code: String,
    pub turf_condition: Option<&'static str>,
    pub turf_condition_inner: String,
    pub turf_condition_middle: String,
    pub turf_condition_outer: String,
    pub turf_track_bias: Option<i64>,
    pub straight_bias_innermost: Option<i64>,
    pub straight_bias_inner: Option<i64>,
    pub straight_bias_middle: Option<i64>,
    pub straight_bias_outer: Option<i64>,
    pub straight_bias_outermost: Option<i64>,
    pub dirt_condition_code: String,
    pub dirt_condition: Option<&'static str>,
    pub dirt_condition_inner: String,
    pub dirt_condition_middle: String,
    pub dirt_condition_outer: String,
    pub dirt_track_bias: Option<i64>,
    pub data_category: String,
    pub consecutive_day: Option<i64>,
    pub turf_type: String,
    pub grass_height: Option<f64>,
    pub rolling_flag: String,
    pub antifreeze_flag: String,
    pub rainfall: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
