//! Repeated finish-count group decoding
//!
//! The extended-stats layout repeats one 12-character structure many times:
//! four 3-digit counts for wins, seconds, thirds and out-of-the-money runs.

use super::field_parsers::{FixedWidthLine, safe_int};
use crate::app::models::FinishCounts;

pub const GROUP_WIDTH: usize = 12;
const COUNT_WIDTH: usize = 3;

/// Decode one 12-character group
///
/// A block shorter than 12 characters yields all-null counts; otherwise each
/// 3-character span is converted on its own, so one bad span nulls only that
/// count.
pub fn decode_counts(block: &str) -> FinishCounts {
    let block = FixedWidthLine::new(block);
    if block.char_len() < GROUP_WIDTH {
        return FinishCounts::default();
    }

    let count = |slot: usize| {
        let start = slot * COUNT_WIDTH;
        safe_int(block.raw(start, start + COUNT_WIDTH), None)
    };

    FinishCounts {
        win: count(0),
        place: count(1),
        show: count(2),
        out: count(3),
    }
}

impl FinishCounts {
    /// Decode one 12-character group, see [`decode_counts`]
    pub fn decode(block: &str) -> Self {
        decode_counts(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_group() {
        let counts = decode_counts("005003002010");
        assert_eq!(counts.win, Some(5));
        assert_eq!(counts.place, Some(3));
        assert_eq!(counts.show, Some(2));
        assert_eq!(counts.out, Some(10));
        assert_eq!(counts.starts(), Some(20));
    }

    #[test]
    fn test_short_group_is_all_null() {
        assert_eq!(decode_counts("00500300201"), FinishCounts::default());
        assert_eq!(decode_counts(""), FinishCounts::default());
        assert_eq!(decode_counts("00500300201").starts(), None);
    }

    #[test]
    fn test_bad_span_nulls_only_that_count() {
        let counts = decode_counts("005x03002   ");
        assert_eq!(counts.win, Some(5));
        assert_eq!(counts.place, None);
        assert_eq!(counts.show, Some(2));
        assert_eq!(counts.out, None);
    }

    #[test]
    fn test_associated_decode_matches_free_function() {
        assert_eq!(FinishCounts::decode("010002003004"), decode_counts("010002003004"));
    }

    #[test]
    fn test_extra_characters_are_ignored() {
        let counts = decode_counts("001000000002XYZ");
        assert_eq!(counts.win, Some(1));
        assert_eq!(counts.out, Some(2));
    }
}
