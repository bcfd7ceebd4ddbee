//! Format tag to warehouse table mapping
//!
//! Each layout loads into exactly one table and is merged on a fixed key set.
//! Horse-entry and race-result feeds share `horse_results`, so the later feed
//! fills in the columns the earlier one left null.

use serde::Serialize;

use crate::app::models::{FormatTag, Layout};

/// Destination table and the columns rows are merged on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LoadTarget {
    pub table: &'static str,
    pub merge_keys: &'static [&'static str],
}

impl LoadTarget {
    pub const RACE_INFO: LoadTarget = LoadTarget {
        table: "race_info",
        merge_keys: &["race_id"],
    };
    pub const HORSE_RESULTS: LoadTarget = LoadTarget {
        table: "horse_results",
        merge_keys: &["race_id", "horse_id"],
    };
    pub const PEDIGREE: LoadTarget = LoadTarget {
        table: "pedigree",
        merge_keys: &["horse_id"],
    };
    pub const HORSE_STATS: LoadTarget = LoadTarget {
        table: "horse_stats",
        merge_keys: &["race_id", "horse_number"],
    };
    pub const MEETING_INFO: LoadTarget = LoadTarget {
        table: "meeting_info",
        merge_keys: &["meeting_key"],
    };

    /// Every distinct target
    pub const ALL: [LoadTarget; 5] = [
        LoadTarget::RACE_INFO,
        LoadTarget::HORSE_RESULTS,
        LoadTarget::PEDIGREE,
        LoadTarget::HORSE_STATS,
        LoadTarget::MEETING_INFO,
    ];

    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::RaceProgram => LoadTarget::RACE_INFO,
            Layout::HorseEntry | Layout::RaceResult => LoadTarget::HORSE_RESULTS,
            Layout::HorseMaster => LoadTarget::PEDIGREE,
            Layout::HorseStats => LoadTarget::HORSE_STATS,
            Layout::Meeting => LoadTarget::MEETING_INFO,
        }
    }

    /// Target for a textual tag, case-insensitive; `None` for unmapped tags
    pub fn for_tag(tag: &str) -> Option<Self> {
        tag.parse::<FormatTag>()
            .ok()
            .map(|tag| Self::for_layout(tag.layout()))
    }
}
