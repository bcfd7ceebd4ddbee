//! Newline-delimited JSON record sink
//!
//! Stands in for the warehouse load: every input file becomes
//! `<output>/<table>/<source>.ndjson`, one flat JSON object per record, and
//! `<output>/manifest.json` records which files landed in which table together
//! with the table's merge keys.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::app::models::Record;
use crate::app::services::load_target::LoadTarget;
use crate::constants::{MANIFEST_FILENAME, get_output_filename};
use crate::{JrdbError, Result};

/// Destination for decoded records
pub trait RecordSink: Send + Sync {
    /// Load the records of one source file into `target`, returning the row count
    fn load(&self, target: &LoadTarget, source: &str, records: &[Record]) -> Result<usize>;
}

/// Manifest entry for one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    pub merge_keys: Vec<String>,
    pub files: BTreeMap<String, usize>,
}

/// Writes records as NDJSON files grouped by table
#[derive(Debug)]
pub struct NdjsonSink {
    output_dir: PathBuf,
    manifest: Mutex<BTreeMap<String, ManifestEntry>>,
    /// Table files written or being written by this sink
    claimed: Mutex<HashSet<PathBuf>>,
}

impl NdjsonSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            manifest: Mutex::new(BTreeMap::new()),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the records of `source` land at for `target`
    pub fn table_file(&self, target: &LoadTarget, source: &str) -> PathBuf {
        self.output_dir
            .join(target.table)
            .join(get_output_filename(source))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILENAME)
    }

    /// Snapshot of the manifest written so far
    pub fn manifest(&self) -> Result<BTreeMap<String, ManifestEntry>> {
        self.manifest
            .lock()
            .map(|manifest| manifest.clone())
            .map_err(|_| JrdbError::sink("manifest", "manifest lock poisoned"))
    }

    /// Reserve `path` so a second load of the same source cannot overwrite it
    fn claim(&self, path: &Path, target: &LoadTarget, source: &str) -> Result<()> {
        let mut claimed = self
            .claimed
            .lock()
            .map_err(|_| JrdbError::sink(target.table, "claim lock poisoned"))?;
        if !claimed.insert(path.to_path_buf()) {
            return Err(JrdbError::sink(
                target.table,
                format!("source {} already loaded into {}", source, path.display()),
            ));
        }
        Ok(())
    }

    fn release(&self, path: &Path) {
        if let Ok(mut claimed) = self.claimed.lock() {
            claimed.remove(path);
        }
    }

    fn write_records(&self, path: &Path, records: &[Record], table: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                JrdbError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let file = File::create(path)
            .map_err(|e| JrdbError::io(format!("Failed to create {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer
                .write_all(b"\n")
                .map_err(|e| JrdbError::sink(table, e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| JrdbError::sink(table, e.to_string()))?;
        Ok(())
    }

    fn record_in_manifest(&self, target: &LoadTarget, source: &str, rows: usize) -> Result<()> {
        let mut manifest = self
            .manifest
            .lock()
            .map_err(|_| JrdbError::sink(target.table, "manifest lock poisoned"))?;

        let entry = manifest
            .entry(target.table.to_string())
            .or_insert_with(|| ManifestEntry {
                merge_keys: target.merge_keys.iter().map(|key| key.to_string()).collect(),
                files: BTreeMap::new(),
            });
        entry.files.insert(source.to_string(), rows);

        let json = serde_json::to_string_pretty(&*manifest)?;
        fs::write(self.manifest_path(), json).map_err(|e| {
            JrdbError::io(format!("Failed to write {}", self.manifest_path().display()), e)
        })?;
        Ok(())
    }
}

impl RecordSink for NdjsonSink {
    fn load(&self, target: &LoadTarget, source: &str, records: &[Record]) -> Result<usize> {
        let path = self.table_file(target, source);
        debug!("Writing {} rows to {}", records.len(), path.display());

        self.claim(&path, target, source)?;
        if let Err(e) = self.write_records(&path, records, target.table) {
            self.release(&path);
            return Err(e);
        }
        self.record_in_manifest(target, source, records.len())?;

        info!(
            "Loaded {} rows into {} (merge on {})",
            records.len(),
            target.table,
            target.merge_keys.join(", ")
        );
        Ok(records.len())
    }
}
