//! Field parsing utilities for fixed-width JRDB lines
//!
//! These converters are the only place a malformed field is allowed to
//! disappear silently: blank or unparseable input yields the caller's default
//! (normally `None`) instead of an error.

use chrono::NaiveDate;

const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Half-open character span `start..end` within a fixed-width line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn width(&self) -> usize {
        self.end - self.start
    }
}

/// A decoded line addressed by character offsets
///
/// Offsets are character indices, not byte indices, so multi-byte characters
/// in name fields count as one position. Spans past the end of the line are
/// clamped, mirroring slice semantics of the feeds' reference tooling.
#[derive(Debug, Clone)]
pub struct FixedWidthLine<'a> {
    text: &'a str,
    boundaries: Vec<usize>,
}

impl<'a> FixedWidthLine<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(index, _)| index).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    /// Number of characters in the line
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Raw text of the half-open character span `start..end`
    pub fn raw(&self, start: usize, end: usize) -> &'a str {
        let len = self.char_len();
        let end = end.min(len);
        let start = start.min(end);
        &self.text[self.boundaries[start]..self.boundaries[end]]
    }

    /// Raw text from `start` to the end of the line
    pub fn tail(&self, start: usize) -> &'a str {
        self.raw(start, self.char_len())
    }

    /// Untrimmed text of a span
    pub fn at(&self, span: Span) -> &'a str {
        self.raw(span.start, span.end)
    }

    /// Trimmed text of a span
    pub fn text(&self, span: Span) -> &'a str {
        self.raw(span.start, span.end).trim()
    }

    /// Trimmed text of a span as an owned string
    pub fn string(&self, span: Span) -> String {
        self.text(span).to_string()
    }

    /// Name field with full-width padding removed
    pub fn name(&self, span: Span) -> String {
        clean_name(self.raw(span.start, span.end))
    }

    pub fn int(&self, span: Span) -> Option<i64> {
        safe_int(self.raw(span.start, span.end), None)
    }

    pub fn float(&self, span: Span) -> Option<f64> {
        safe_float(self.raw(span.start, span.end), None)
    }

    pub fn date(&self, span: Span) -> Option<String> {
        parse_date(self.raw(span.start, span.end))
    }

    pub fn tenths(&self, span: Span) -> Option<f64> {
        scaled_tenths(self.raw(span.start, span.end))
    }

    pub fn signed(&self, span: Span) -> Option<i64> {
        parse_signed(self.raw(span.start, span.end))
    }
}

/// Parse an integer, returning `default` for blank or invalid input
pub fn safe_int(value: &str, default: Option<i64>) -> Option<i64> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return default;
    }
    cleaned.parse::<i64>().ok().or(default)
}

/// Parse a float, returning `default` for blank or invalid input
pub fn safe_float(value: &str, default: Option<f64>) -> Option<f64> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return default;
    }
    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => default,
    }
}

/// Convert `YYYYMMDD` to ISO `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Option<String> {
    let cleaned = value.trim();
    if cleaned.len() != 8 || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(cleaned, "%Y%m%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Integer stored in tenths, e.g. `"550"` → `55.0`; zero means absent
pub fn scaled_tenths(value: &str) -> Option<f64> {
    match safe_int(value, None) {
        Some(0) | None => None,
        Some(raw) => Some(raw as f64 / 10.0),
    }
}

/// Fixed-width signed integer such as `"+04"`, `"- 2"` or `" 00"`
pub fn parse_signed(value: &str) -> Option<i64> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(compact.as_str());
    safe_int(digits, None)
}

/// Elapsed race time in `MSSS` form: one minute digit and tenths of a second
pub fn parse_race_time(value: &str) -> Option<f64> {
    let cleaned = value.trim();
    if cleaned.len() != 4 || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let minutes = safe_int(&cleaned[..1], None)?;
    let tenths = safe_int(&cleaned[1..], None)?;
    let total_tenths = minutes * 600 + tenths;
    if total_tenths == 0 {
        None
    } else {
        Some(total_tenths as f64 / 10.0)
    }
}

/// Positive integer; zero is treated as absent
pub fn positive_int(value: &str) -> Option<i64> {
    safe_int(value, None).filter(|parsed| *parsed > 0)
}

/// Trim ordinary and full-width whitespace and drop embedded full-width spaces
pub fn clean_name(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| *c != FULL_WIDTH_SPACE)
        .collect()
}
