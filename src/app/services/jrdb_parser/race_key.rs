//! Race and meeting key decoding
//!
//! A race key is `venue(2) + year(2) + meeting(1) + day(1) + race(2)`; a
//! meeting key is the same without the race number. The day digit is
//! hexadecimal in JRDB feeds so days 10-12 appear as `a`-`c`.

use crate::error::KeyError;

pub const RACE_KEY_LENGTH: usize = 8;
pub const MEETING_KEY_LENGTH: usize = 6;

/// Two-digit years at or below this pivot belong to the 2000s
pub const CENTURY_PIVOT: u32 = 50;

/// Decoded 8-character race key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceKey {
    pub key: String,
    pub venue_code: String,
    pub year: i32,
    pub meeting_number: u32,
    pub day_number: u32,
    pub race_number: u32,
}

impl RaceKey {
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let key = text.trim();
        let meeting = MeetingKey::parse_prefix(key, RACE_KEY_LENGTH)?;
        let race_number = numeric(key, "race number", &key[6..8], 10)?;

        Ok(Self {
            key: key.to_string(),
            venue_code: meeting.venue_code,
            year: meeting.year,
            meeting_number: meeting.meeting_number,
            day_number: meeting.day_number,
            race_number,
        })
    }

    /// The meeting key this race belongs to
    pub fn meeting_key(&self) -> &str {
        &self.key[..MEETING_KEY_LENGTH]
    }
}

/// Decoded 6-character meeting key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingKey {
    pub key: String,
    pub venue_code: String,
    pub year: i32,
    pub meeting_number: u32,
    pub day_number: u32,
}

impl MeetingKey {
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        Self::parse_prefix(text.trim(), MEETING_KEY_LENGTH)
    }

    /// Validate `key` against `expected` length and decode its first six characters
    fn parse_prefix(key: &str, expected: usize) -> Result<Self, KeyError> {
        let actual = key.chars().count();
        if actual != expected {
            return Err(KeyError::WrongLength {
                key: key.to_string(),
                expected,
                actual,
            });
        }
        if !key.is_ascii() {
            return Err(KeyError::InvalidComponent {
                key: key.to_string(),
                component: "character set",
                value: key.to_string(),
            });
        }

        let year_code = numeric(key, "year", &key[2..4], 10)?;
        let meeting_number = numeric(key, "meeting number", &key[4..5], 10)?;
        let day_number = numeric(key, "day number", &key[5..6], 16)?;

        Ok(Self {
            key: key[..MEETING_KEY_LENGTH].to_string(),
            venue_code: key[..2].to_string(),
            year: resolve_year(year_code),
            meeting_number,
            day_number,
        })
    }
}

/// Expand a two-digit year: 0-50 → 2000s, 51-99 → 1900s
pub fn resolve_year(two_digit: u32) -> i32 {
    if two_digit <= CENTURY_PIVOT {
        2000 + two_digit as i32
    } else {
        1900 + two_digit as i32
    }
}

fn numeric(key: &str, component: &'static str, value: &str, radix: u32) -> Result<u32, KeyError> {
    u32::from_str_radix(value, radix).map_err(|_| KeyError::InvalidComponent {
        key: key.to_string(),
        component,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_race_key() {
        let key = RaceKey::parse("06261101").unwrap();
        assert_eq!(key.key, "06261101");
        assert_eq!(key.venue_code, "06");
        assert_eq!(key.year, 2026);
        assert_eq!(key.meeting_number, 1);
        assert_eq!(key.day_number, 1);
        assert_eq!(key.race_number, 1);
        assert_eq!(key.meeting_key(), "062611");

        let key = RaceKey::parse("05240305").unwrap();
        assert_eq!(key.venue_code, "05");
        assert_eq!(key.year, 2024);
        assert_eq!(key.meeting_number, 3);
        assert_eq!(key.race_number, 5);
    }

    #[test]
    fn test_century_window() {
        assert_eq!(RaceKey::parse("06241101").unwrap().year, 2024);
        assert_eq!(RaceKey::parse("06991101").unwrap().year, 1999);
        assert_eq!(RaceKey::parse("06501101").unwrap().year, 2050);
        assert_eq!(RaceKey::parse("06511101").unwrap().year, 1951);
        assert_eq!(RaceKey::parse("06001101").unwrap().year, 2000);
    }

    #[test]
    fn test_hex_day_digit() {
        let key = RaceKey::parse("05253a11").unwrap();
        assert_eq!(key.day_number, 10);
        assert_eq!(key.race_number, 11);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        for bad in ["", "0626110", "062611011", "06 26"] {
            match RaceKey::parse(bad) {
                Err(KeyError::WrongLength { expected, .. }) => assert_eq!(expected, 8),
                other => panic!("expected WrongLength for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_non_numeric_components_are_rejected() {
        assert!(matches!(
            RaceKey::parse("06XX1101"),
            Err(KeyError::InvalidComponent { component: "year", .. })
        ));
        assert!(matches!(
            RaceKey::parse("0626110X"),
            Err(KeyError::InvalidComponent { component: "race number", .. })
        ));
        assert!(matches!(
            RaceKey::parse("0626１101"),
            Err(KeyError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_parse_meeting_key() {
        let key = MeetingKey::parse("092541").unwrap();
        assert_eq!(key.venue_code, "09");
        assert_eq!(key.year, 2025);
        assert_eq!(key.meeting_number, 4);
        assert_eq!(key.day_number, 1);

        assert!(matches!(
            MeetingKey::parse("09254"),
            Err(KeyError::WrongLength { expected: 6, actual: 5, .. })
        ));
    }
}
