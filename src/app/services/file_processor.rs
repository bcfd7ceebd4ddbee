//! Per-file load orchestration
//!
//! One feed file goes through name check, tag lookup, decoding, parsing and
//! the sink. Every outcome, including failures, is reported as a
//! [`FileOutcome`] so a batch run can summarize without aborting.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::app::models::FormatTag;
use crate::app::services::byte_source::{FeedFileName, read_decoded};
use crate::app::services::jrdb_parser::{JrdbParser, ParseStats};
use crate::app::services::load_target::LoadTarget;
use crate::app::services::ndjson_sink::RecordSink;
use crate::config::ParserConfig;
use crate::Result;

/// How processing of one file ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Success,
    /// File name does not follow the feed convention
    Skipped,
    /// Tag has no table mapping
    Unsupported,
    /// No records could be parsed
    Empty,
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Success => "success",
            FileStatus::Skipped => "skipped",
            FileStatus::Unsupported => "unsupported",
            FileStatus::Empty => "empty",
            FileStatus::Failed => "failed",
        }
    }
}

/// Result of processing one file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub status: FileStatus,
    pub file: PathBuf,
    pub tag: Option<String>,
    pub table: Option<&'static str>,
    /// Name the records were loaded under
    pub source: Option<String>,
    pub records_processed: usize,
    pub stats: Option<ParseStats>,
    /// Content needed lossy decoding
    pub had_replacements: bool,
    pub error: Option<String>,
}

impl FileOutcome {
    fn new(file: &Path) -> Self {
        Self {
            status: FileStatus::Failed,
            file: file.to_path_buf(),
            tag: None,
            table: None,
            source: None,
            records_processed: 0,
            stats: None,
            had_replacements: false,
            error: None,
        }
    }

    fn finish(mut self, status: FileStatus, error: Option<String>) -> Self {
        self.status = status;
        self.error = error;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Success
    }
}

/// Load name for `path`, unique among files discovered under `input_root`
///
/// Files directly under the root keep their stem (`BAA260104`); nested files
/// are prefixed with their directories (`2026_01_BAA260104`).
pub fn source_name(path: &Path, input_root: &Path) -> String {
    let relative = path.strip_prefix(input_root).unwrap_or(path);
    let parts: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        file_stem(path)
    } else {
        parts.join("_")
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Process one feed file end to end, loading it under its file stem
pub async fn process_file<S>(path: &Path, config: &ParserConfig, sink: &S) -> FileOutcome
where
    S: RecordSink + ?Sized,
{
    process_file_as(path, &file_stem(path), config, sink).await
}

/// Process one feed file end to end, loading it under `source`
pub async fn process_file_as<S>(
    path: &Path,
    source: &str,
    config: &ParserConfig,
    sink: &S,
) -> FileOutcome
where
    S: RecordSink + ?Sized,
{
    let mut outcome = FileOutcome::new(path);

    let names = match FeedFileName::new(config.normalized_extension()) {
        Ok(names) => names,
        Err(e) => return outcome.finish(FileStatus::Failed, Some(e.to_string())),
    };

    let Some(tag_text) = names.extract_tag(path) else {
        warn!("Cannot extract data type from filename: {}", path.display());
        return outcome.finish(FileStatus::Skipped, Some("Invalid filename format".to_string()));
    };
    outcome.tag = Some(tag_text.clone());

    let Ok(tag) = tag_text.parse::<FormatTag>() else {
        warn!("No table mapping for data type: {}", tag_text);
        return outcome.finish(
            FileStatus::Unsupported,
            Some(format!("Unsupported data type: {}", tag_text)),
        );
    };
    let target = LoadTarget::for_layout(tag.layout());
    outcome.table = Some(target.table);

    info!(
        "Processing file: {} (type: {}, table: {})",
        path.display(),
        tag,
        target.table
    );

    let decoded = match read_decoded(path).await {
        Ok(decoded) => decoded,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return outcome.finish(FileStatus::Failed, Some(format!("File decode error: {}", e)));
        }
    };
    outcome.had_replacements = decoded.had_replacements;

    let result = JrdbParser::new(tag).parse_content(&decoded.text);
    let success_rate = result.stats.success_rate();
    outcome.stats = Some(result.stats);

    if result.records.is_empty() {
        warn!("No data parsed from file: {}", path.display());
        return outcome.finish(FileStatus::Empty, Some("No data parsed".to_string()));
    }
    if success_rate < config.min_success_rate {
        warn!(
            "{}: only {:.1}% of data lines decoded (threshold {:.1}%)",
            path.display(),
            success_rate,
            config.min_success_rate
        );
    }

    let source = if source.is_empty() {
        tag.to_string()
    } else {
        source.to_string()
    };

    match sink.load(&target, &source, &result.records) {
        Ok(loaded) => {
            outcome.records_processed = loaded;
            outcome.source = Some(source);
            info!(
                "Successfully processed {}: {} records loaded to {}",
                path.display(),
                loaded,
                target.table
            );
            outcome.finish(FileStatus::Success, None)
        }
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            outcome.finish(FileStatus::Failed, Some(e.to_string()))
        }
    }
}

/// Feed files under `input` whose names follow the convention, sorted by path
pub fn discover_files(input: &Path, config: &ParserConfig) -> Result<Vec<PathBuf>> {
    let names = FeedFileName::new(config.normalized_extension())?;
    let mut files = Vec::new();

    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && names.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Record;
    use crate::{JrdbError, Result};
    use std::sync::Mutex;

    /// Sink that keeps loads in memory
    #[derive(Default)]
    struct MemorySink {
        loads: Mutex<Vec<(String, String, usize)>>,
        fail: bool,
    }

    impl RecordSink for MemorySink {
        fn load(&self, target: &LoadTarget, source: &str, records: &[Record]) -> Result<usize> {
            if self.fail {
                return Err(JrdbError::sink(target.table, "rejected"));
            }
            self.loads.lock().unwrap().push((
                target.table.to_string(),
                source.to_string(),
                records.len(),
            ));
            Ok(records.len())
        }
    }

    fn race_program_content() -> String {
        ["06261101", "06261102"]
            .iter()
            .map(|key| format!("{}{}", key, " ".repeat(92)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BAA260104.csv");
        std::fs::write(&path, race_program_content()).unwrap();
        let sink = MemorySink::default();

        let outcome = process_file(&path, &ParserConfig::default(), &sink).await;

        assert_eq!(outcome.status, FileStatus::Success);
        assert_eq!(outcome.tag.as_deref(), Some("BAA"));
        assert_eq!(outcome.table, Some("race_info"));
        assert_eq!(outcome.records_processed, 2);
        assert!(outcome.error.is_none());
        assert_eq!(
            sink.loads.lock().unwrap().as_slice(),
            &[("race_info".to_string(), "BAA260104".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_invalid_filename_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.csv");
        std::fs::write(&path, "x").unwrap();

        let outcome = process_file(&path, &ParserConfig::default(), &MemorySink::default()).await;
        assert_eq!(outcome.status, FileStatus::Skipped);
        assert_eq!(outcome.error.as_deref(), Some("Invalid filename format"));
    }

    #[tokio::test]
    async fn test_unmapped_tag_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ZZZ260104.csv");
        std::fs::write(&path, race_program_content()).unwrap();

        let outcome = process_file(&path, &ParserConfig::default(), &MemorySink::default()).await;
        assert_eq!(outcome.status, FileStatus::Unsupported);
        assert_eq!(outcome.tag.as_deref(), Some("ZZZ"));
        assert_eq!(outcome.error.as_deref(), Some("Unsupported data type: ZZZ"));
    }

    #[tokio::test]
    async fn test_no_records_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SED260104.csv");
        std::fs::write(&path, "too short\n\n").unwrap();

        let outcome = process_file(&path, &ParserConfig::default(), &MemorySink::default()).await;
        assert_eq!(outcome.status, FileStatus::Empty);
        let stats = outcome.stats.unwrap();
        assert_eq!(stats.lines_skipped, 1);
        assert_eq!(stats.blank_lines, 2);
    }

    #[tokio::test]
    async fn test_missing_file_and_sink_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("BAA260104.csv");
        let outcome =
            process_file(&missing, &ParserConfig::default(), &MemorySink::default()).await;
        assert_eq!(outcome.status, FileStatus::Failed);
        assert!(outcome.error.unwrap().starts_with("File decode error"));

        std::fs::write(&missing, race_program_content()).unwrap();
        let failing = MemorySink {
            fail: true,
            ..MemorySink::default()
        };
        let outcome = process_file(&missing, &ParserConfig::default(), &failing).await;
        assert_eq!(outcome.status, FileStatus::Failed);
        assert_eq!(outcome.records_processed, 0);
    }

    #[test]
    fn test_source_name_keeps_nested_files_apart() {
        let root = Path::new("/feeds");
        assert_eq!(source_name(&root.join("BAA260104.csv"), root), "BAA260104");
        assert_eq!(
            source_name(&root.join("2026").join("01").join("BAA260104.csv"), root),
            "2026_01_BAA260104"
        );
        assert_ne!(
            source_name(&root.join("a").join("BAA260104.csv"), root),
            source_name(&root.join("b").join("BAA260104.csv"), root)
        );

        // A single file passed as the input root
        let file = root.join("BAA260104.csv");
        assert_eq!(source_name(&file, &file), "BAA260104");
    }

    #[tokio::test]
    async fn test_process_file_as_uses_given_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BAA260104.csv");
        std::fs::write(&path, race_program_content()).unwrap();
        let sink = MemorySink::default();

        let outcome =
            process_file_as(&path, "a_BAA260104", &ParserConfig::default(), &sink).await;
        assert_eq!(outcome.source.as_deref(), Some("a_BAA260104"));
        assert_eq!(sink.loads.lock().unwrap()[0].1, "a_BAA260104");
    }

    #[test]
    fn test_discover_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Sed");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("BAA260104.csv"), "").unwrap();
        std::fs::write(nested.join("SED260104.csv"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();
        std::fs::write(dir.path().join("KYF260104.txt"), "").unwrap();

        let files = discover_files(dir.path(), &ParserConfig::default()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|file| file.extension().unwrap() == "csv"));

        let txt = discover_files(dir.path(), &ParserConfig::default().with_extension("txt"))
            .unwrap();
        assert_eq!(txt.len(), 1);
    }
}
