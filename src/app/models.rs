//! Domain models for JRDB record parsing
//!
//! This module defines the format tags that identify each JRDB feed, the
//! closed set of record layouts those tags decode with, and the [`Record`]
//! enum returned by the file-level dispatcher.

pub mod records;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use records::{
    FinishCounts, HorseResultRecord, HorseStatsRecord, MeetingRecord, PedigreeRecord,
    RaceInfoRecord, StatGroup,
};

/// Three-letter JRDB format tag, as found at the start of a feed file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormatTag {
    Baa,
    Bab,
    Bac,
    Kyf,
    Kyg,
    Kyh,
    Sec,
    Sed,
    Ukc,
    Kka,
    Kaa,
    Kab,
}

impl FormatTag {
    /// Every supported tag, in display order
    pub const ALL: [FormatTag; 12] = [
        FormatTag::Baa,
        FormatTag::Bab,
        FormatTag::Bac,
        FormatTag::Kyf,
        FormatTag::Kyg,
        FormatTag::Kyh,
        FormatTag::Sec,
        FormatTag::Sed,
        FormatTag::Ukc,
        FormatTag::Kka,
        FormatTag::Kaa,
        FormatTag::Kab,
    ];

    /// The record layout used to decode lines of this tag
    pub fn layout(&self) -> Layout {
        match self {
            FormatTag::Baa | FormatTag::Bab | FormatTag::Bac => Layout::RaceProgram,
            FormatTag::Kyf | FormatTag::Kyg | FormatTag::Kyh => Layout::HorseEntry,
            FormatTag::Sec | FormatTag::Sed => Layout::RaceResult,
            FormatTag::Ukc => Layout::HorseMaster,
            FormatTag::Kka => Layout::HorseStats,
            FormatTag::Kaa | FormatTag::Kab => Layout::Meeting,
        }
    }

    /// Uppercase tag text
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Baa => "BAA",
            FormatTag::Bab => "BAB",
            FormatTag::Bac => "BAC",
            FormatTag::Kyf => "KYF",
            FormatTag::Kyg => "KYG",
            FormatTag::Kyh => "KYH",
            FormatTag::Sec => "SEC",
            FormatTag::Sed => "SED",
            FormatTag::Ukc => "UKC",
            FormatTag::Kka => "KKA",
            FormatTag::Kaa => "KAA",
            FormatTag::Kab => "KAB",
        }
    }
}

impl FromStr for FormatTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        FormatTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == upper)
            .ok_or_else(|| format!("unknown format tag '{}'", s.trim()))
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-width record layouts
///
/// Adding a feed format is a deliberate change to this enum: each variant
/// owns its own offset table in `jrdb_parser::layouts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    RaceProgram,
    HorseEntry,
    RaceResult,
    HorseMaster,
    HorseStats,
    Meeting,
}

impl Layout {
    /// Shortest line, in characters, the layout accepts
    pub fn minimum_length(&self) -> usize {
        match self {
            Layout::RaceProgram => 100,
            Layout::HorseEntry => 500,
            Layout::RaceResult => 338,
            Layout::HorseMaster => 284,
            Layout::HorseStats => 306,
            Layout::Meeting => 63,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layout::RaceProgram => "race program",
            Layout::HorseEntry => "horse entry",
            Layout::RaceResult => "race result",
            Layout::HorseMaster => "horse master",
            Layout::HorseStats => "horse extended stats",
            Layout::Meeting => "meeting condition",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded line of any layout
///
/// Serializes as the flat field mapping of the wrapped record, so rows of one
/// file always share the same field set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    RaceInfo(RaceInfoRecord),
    HorseResult(HorseResultRecord),
    Pedigree(PedigreeRecord),
    HorseStats(HorseStatsRecord),
    Meeting(MeetingRecord),
}

impl Record {
    /// Flatten into an ordered field map ready for a row-oriented sink
    pub fn to_row(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // Every record variant is a struct and serializes to an object
            _ => serde_json::Map::new(),
        }
    }

    /// Look up a single field by name
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        self.to_row().remove(name)
    }
}
