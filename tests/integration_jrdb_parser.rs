//! End-to-end tests for feed processing
//!
//! Feed files are written to a temporary directory in the encodings JRDB
//! actually ships (CP932, occasionally UTF-8) and pushed through discovery,
//! decoding, parsing and the NDJSON sink.

use jrdb_parser::app::services::byte_source::{SourceEncoding, decode_bytes};
use jrdb_parser::app::services::file_processor::{FileStatus, discover_files, process_file};
use jrdb_parser::app::services::ndjson_sink::{NdjsonSink, RecordSink};
use jrdb_parser::app::services::quality_check::{QualityChecker, Severity};
use jrdb_parser::{LoadTarget, ParserConfig, Record, parse_content};
use serde_json::Value;
use std::path::Path;

/// Place text at character offsets on a line of spaces
fn fixed_width(width: usize, fields: &[(usize, &str)]) -> String {
    let mut chars = vec![' '; width];
    for (start, text) in fields {
        for (offset, c) in text.chars().enumerate() {
            let index = start + offset;
            if index >= chars.len() {
                chars.resize(index + 1, ' ');
            }
            chars[index] = c;
        }
    }
    chars.into_iter().collect()
}

fn race_program_line(race: u32, distance: &str) -> String {
    fixed_width(
        100,
        &[
            (0, &format!("062611{:02}", race)),
            (8, "20260104"),
            (16, "1005"),
            (20, distance),
            (36, "ニューイヤーステークス"),
        ],
    )
}

fn horse_master_line() -> String {
    fixed_width(
        284,
        &[
            (0, "19100001"),
            (8, "サンプル\u{3000}ヒメ"),
            (44, "2"),
            (157, "20190315"),
            (259, "日高"),
        ],
    )
}

fn write_cp932(path: &Path, text: &str) {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors);
    std::fs::write(path, bytes).unwrap();
}

fn read_ndjson(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Purpose: a CP932 race-program file lands in race_info with decoded Japanese text
#[tokio::test]
async fn test_cp932_race_program_to_ndjson() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = input.path().join("BAA260104.csv");
    let content = [
        race_program_line(1, "1200"),
        race_program_line(2, "1800"),
        String::new(),
    ]
    .join("\r\n");
    write_cp932(&path, &content);

    let sink = NdjsonSink::new(output.path());
    let outcome = process_file(&path, &ParserConfig::default(), &sink).await;

    assert_eq!(outcome.status, FileStatus::Success);
    assert_eq!(outcome.records_processed, 2);
    assert!(!outcome.had_replacements);
    let stats = outcome.stats.unwrap();
    assert_eq!(stats.total_lines, 3);
    assert_eq!(stats.blank_lines, 1);
    assert_eq!(stats.success_rate(), 100.0);

    let rows = read_ndjson(&output.path().join("race_info/BAA260104.ndjson"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["race_id"], "06261101");
    assert_eq!(rows[0]["venue_name"], "中山");
    assert_eq!(rows[0]["race_date"], "2026-01-04");
    assert_eq!(rows[0]["race_name"], "ニューイヤーステークス");
    assert_eq!(rows[1]["distance"], 1800);
}

/// Purpose: horse master names lose full-width padding after a CP932 round trip
#[tokio::test]
async fn test_cp932_horse_master_names() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = input.path().join("UKC260104.csv");
    write_cp932(&path, &horse_master_line());

    let sink = NdjsonSink::new(output.path());
    let outcome = process_file(&path, &ParserConfig::default(), &sink).await;
    assert_eq!(outcome.status, FileStatus::Success);
    assert_eq!(outcome.table, Some("pedigree"));

    let rows = read_ndjson(&output.path().join("pedigree/UKC260104.ndjson"));
    assert_eq!(rows[0]["horse_id"], "19100001");
    assert_eq!(rows[0]["horse_name"], "サンプルヒメ");
    assert_eq!(rows[0]["sex"], "牝");
    assert_eq!(rows[0]["birth_date"], "2019-03-15");
    assert_eq!(rows[0]["birthplace"], "日高");
}

/// Purpose: a directory run routes each file to its table and records merge keys
#[tokio::test]
async fn test_directory_run_builds_manifest() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let nested = input.path().join("2026").join("01");
    std::fs::create_dir_all(&nested).unwrap();

    write_cp932(&input.path().join("BAA260104.csv"), &race_program_line(1, "1200"));
    write_cp932(&nested.join("BAB260105.csv"), &race_program_line(3, "2000"));
    write_cp932(&nested.join("UKC260105.csv"), &horse_master_line());
    std::fs::write(input.path().join("notes.txt"), "not a feed").unwrap();

    let config = ParserConfig::default().with_output_dir(output.path());
    let files = discover_files(input.path(), &config).unwrap();
    assert_eq!(files.len(), 3);

    let sink = NdjsonSink::new(config.output_dir.clone());
    for file in &files {
        let outcome = process_file(file, &config, &sink).await;
        assert!(outcome.is_success(), "{:?}", outcome);
    }

    let manifest: Value = serde_json::from_str(
        &std::fs::read_to_string(output.path().join("manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["race_info"]["merge_keys"][0], "race_id");
    assert_eq!(manifest["race_info"]["files"]["BAB260105"], 1);
    assert_eq!(manifest["pedigree"]["merge_keys"][0], "horse_id");
    assert!(manifest.get("horse_results").is_none());
}

/// Purpose: UTF-8 files that are not valid CP932 are still decoded cleanly
#[test]
fn test_utf8_fallback_feeds_parser() {
    let line = format!("{}à", race_program_line(4, "1400"));
    let decoded = decode_bytes(line.as_bytes());
    assert_eq!(decoded.encoding, SourceEncoding::Utf8);
    assert!(!decoded.had_replacements);

    let result = parse_content(&decoded.text, "BAA");
    assert_eq!(result.records.len(), 1);
}

/// Purpose: a custom sink sees exactly the records the parser produced
#[test]
fn test_custom_sink_receives_records() {
    struct CountingSink(std::sync::atomic::AtomicUsize);

    impl RecordSink for CountingSink {
        fn load(
            &self,
            _target: &LoadTarget,
            _source: &str,
            records: &[Record],
        ) -> jrdb_parser::Result<usize> {
            self.0
                .fetch_add(records.len(), std::sync::atomic::Ordering::SeqCst);
            Ok(records.len())
        }
    }

    let sink = CountingSink(Default::default());
    let result = parse_content(&race_program_line(5, "1600"), "BAC");
    let target = LoadTarget::for_tag("bac").unwrap();
    sink.load(&target, "BAC260104", &result.records).unwrap();
    assert_eq!(sink.0.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// Purpose: quality checks flag a duplicated race key across a file
#[test]
fn test_quality_gate_on_parsed_file() {
    let content = [race_program_line(6, "1200"), race_program_line(6, "1200")].join("\n");
    let result = parse_content(&content, "BAA");

    let report =
        QualityChecker::new(LoadTarget::RACE_INFO, 90.0).check(&result.records, &result.stats);
    assert!(!report.is_passing());
    assert_eq!(report.count(Severity::Error), 1);
}
