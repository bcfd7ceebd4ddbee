//! Record-level data quality checks
//!
//! Runs over the rows one file produced for one table: row count, required
//! columns, duplicate merge keys, date window and numeric ranges, plus the
//! parse success rate. Each check yields a [`CheckResult`] with a severity; only
//! error-severity failures make a report fail.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;

use crate::app::models::Record;
use crate::app::services::jrdb_parser::ParseStats;
use crate::app::services::load_target::LoadTarget;
use crate::constants::ranges;

/// Earliest race date the feeds are expected to carry
pub const MIN_RACE_DATE: (i32, u32, u32) = (2016, 1, 1);

/// Days into the future a race date may lie
pub const MAX_FUTURE_DAYS: i64 = 7;

/// Rows a single file is expected to yield unless overridden
pub const DEFAULT_MIN_ROWS: usize = 1;

type Row = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check_name: String,
    pub table_name: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    pub details: Value,
}

/// Outcome of every check run against one batch of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub results: Vec<CheckResult>,
}

impl QualityReport {
    pub fn total_checks(&self) -> usize {
        self.results.len()
    }

    pub fn passed_checks(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_checks(&self) -> usize {
        self.total_checks() - self.passed_checks()
    }

    /// Failed checks of the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|r| !r.passed && r.severity == severity)
            .count()
    }

    /// No error-severity check failed
    pub fn is_passing(&self) -> bool {
        self.count(Severity::Error) == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// Per-table validation rules
#[derive(Debug, Clone)]
pub struct TableRules {
    pub target: LoadTarget,
    pub not_null_columns: &'static [&'static str],
    pub date_columns: &'static [&'static str],
    pub numeric_ranges: &'static [(&'static str, (f64, f64))],
    pub expected_min_rows: usize,
}

impl TableRules {
    pub fn for_target(target: LoadTarget) -> Self {
        let (not_null_columns, date_columns, numeric_ranges): (
            &'static [&'static str],
            &'static [&'static str],
            &'static [(&'static str, (f64, f64))],
        ) = match target.table {
            "race_info" => (
                &["race_id", "race_date", "venue_code", "race_number"],
                &["race_date"],
                &[
                    ("race_number", ranges::RACE_NUMBER),
                    ("distance", ranges::DISTANCE),
                    ("num_horses", ranges::NUM_HORSES),
                ],
            ),
            "horse_results" => (
                &["race_id", "horse_id"],
                &[],
                &[
                    ("finish_position", ranges::FINISH_POSITION),
                    ("odds", ranges::ODDS),
                    ("popularity", ranges::POPULARITY),
                ],
            ),
            "pedigree" => (&["horse_id"], &[], &[]),
            "horse_stats" => (&["race_id", "horse_number"], &[], &[]),
            "meeting_info" => (&["meeting_key", "race_date"], &["race_date"], &[]),
            _ => (&[], &[], &[]),
        };

        Self {
            target,
            not_null_columns,
            date_columns,
            numeric_ranges,
            expected_min_rows: DEFAULT_MIN_ROWS,
        }
    }
}

/// Runs the quality checks for one table
#[derive(Debug, Clone)]
pub struct QualityChecker {
    rules: TableRules,
    min_success_rate: f64,
}

impl QualityChecker {
    pub fn new(target: LoadTarget, min_success_rate: f64) -> Self {
        Self {
            rules: TableRules::for_target(target),
            min_success_rate,
        }
    }

    /// Expect at least `min_rows` rows per batch
    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.rules.expected_min_rows = min_rows;
        self
    }

    /// Check rows and parse statistics against today's date window
    pub fn check(&self, records: &[Record], stats: &ParseStats) -> QualityReport {
        self.check_at(records, stats, Utc::now().date_naive())
    }

    pub fn check_at(
        &self,
        records: &[Record],
        stats: &ParseStats,
        today: NaiveDate,
    ) -> QualityReport {
        let rows: Vec<_> = records.iter().map(Record::to_row).collect();
        let mut report = QualityReport::default();

        report.results.push(self.check_success_rate(stats));
        report.results.push(self.check_row_count(&rows));
        for column in self.rules.not_null_columns {
            report.results.push(self.check_not_null(&rows, column));
        }
        report.results.push(self.check_duplicates(&rows));
        for column in self.rules.date_columns {
            report.results.push(self.check_date_range(&rows, column, today));
        }
        for (column, range) in self.rules.numeric_ranges {
            report.results.push(self.check_numeric_range(&rows, column, *range));
        }

        report
    }

    fn result(
        &self,
        check_name: String,
        passed: bool,
        severity: Severity,
        message: String,
        details: Value,
    ) -> CheckResult {
        CheckResult {
            check_name,
            table_name: self.rules.target.table.to_string(),
            passed,
            severity,
            message,
            details,
        }
    }

    fn check_success_rate(&self, stats: &ParseStats) -> CheckResult {
        let rate = stats.success_rate();
        let passed = rate >= self.min_success_rate;
        self.result(
            "success_rate_check".to_string(),
            passed,
            Severity::Warning,
            format!(
                "{:.1}% of {} data lines decoded (minimum {:.1}%)",
                rate,
                stats.data_lines(),
                self.min_success_rate
            ),
            json!({ "lines_skipped": stats.lines_skipped }),
        )
    }

    fn check_row_count(&self, rows: &[Row]) -> CheckResult {
        let expected = self.rules.expected_min_rows;
        self.result(
            "row_count_check".to_string(),
            rows.len() >= expected,
            Severity::Warning,
            format!("{} rows (expected at least {})", rows.len(), expected),
            json!({ "row_count": rows.len(), "expected_min": expected }),
        )
    }

    fn check_not_null(&self, rows: &[Row], column: &str) -> CheckResult {
        let missing = rows.iter().filter(|row| is_missing(row.get(column))).count();
        self.result(
            format!("null_check_{}", column),
            missing == 0,
            Severity::Error,
            format!("{} of {} rows have no {}", missing, rows.len(), column),
            json!({ "column": column, "null_count": missing }),
        )
    }

    fn check_duplicates(&self, rows: &[Row]) -> CheckResult {
        let keys = self.rules.target.merge_keys;
        let mut seen: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let key = keys
                .iter()
                .map(|column| row.get(*column).map(Value::to_string).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("|");
            *seen.entry(key).or_default() += 1;
        }
        let duplicates = seen.values().filter(|count| **count > 1).count();

        self.result(
            "duplicate_check".to_string(),
            duplicates == 0,
            Severity::Error,
            format!("{} duplicate {} key(s)", duplicates, keys.join("+")),
            json!({ "key_columns": keys, "duplicate_count": duplicates }),
        )
    }

    fn check_date_range(
        &self,
        rows: &[Row],
        column: &str,
        today: NaiveDate,
    ) -> CheckResult {
        let (year, month, day) = MIN_RACE_DATE;
        let min_date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);
        let max_date = today + Duration::days(MAX_FUTURE_DAYS);

        let out_of_range = rows
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_str))
            .filter_map(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
            .filter(|date| *date < min_date || *date > max_date)
            .count();

        self.result(
            format!("date_range_check_{}", column),
            out_of_range == 0,
            Severity::Warning,
            format!(
                "{} {} values outside {} to {}",
                out_of_range, column, min_date, max_date
            ),
            json!({ "column": column, "out_of_range_count": out_of_range }),
        )
    }

    fn check_numeric_range(
        &self,
        rows: &[Row],
        column: &str,
        (min, max): (f64, f64),
    ) -> CheckResult {
        let out_of_range = rows
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_f64))
            .filter(|value| *value < min || *value > max)
            .count();

        self.result(
            format!("numeric_range_check_{}", column),
            out_of_range == 0,
            Severity::Info,
            format!("{} {} values outside {} to {}", out_of_range, column, min, max),
            json!({ "column": column, "min": min, "max": max, "out_of_range_count": out_of_range }),
        )
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}
