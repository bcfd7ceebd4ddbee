//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional JSON config file,
//! then `JRDB_*` environment variables (a `.env` file is loaded by the binary),
//! then command-line flags applied through the `with_*` builders.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    DEFAULT_EXTENSION, DEFAULT_MIN_SUCCESS_RATE, DEFAULT_OUTPUT_DIR, ENV_EXTENSION,
    ENV_OUTPUT_DIR, ENV_WORKERS,
};
use crate::{JrdbError, Result};

/// Runtime settings for feed processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Files processed concurrently
    pub workers: usize,

    /// Feed file extension, without the dot
    pub extension: String,

    /// Root directory for per-table output
    pub output_dir: PathBuf,

    /// Treat a file that yields no records as a failure
    pub fail_on_empty: bool,

    /// Success rate (percent of data lines) below which a file is flagged
    pub min_success_rate: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            extension: DEFAULT_EXTENSION.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fail_on_empty: false,
            min_success_rate: DEFAULT_MIN_SUCCESS_RATE,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with an optional config file and the process environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| JrdbError::io(format!("Failed to read config {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            JrdbError::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override fields from `JRDB_*` variables resolved through `lookup`
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(workers) = lookup(ENV_WORKERS) {
            self.workers = workers.trim().parse().map_err(|_| {
                JrdbError::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_WORKERS, workers
                ))
            })?;
        }
        if let Some(extension) = lookup(ENV_EXTENSION) {
            self.extension = extension.trim().to_string();
        }
        if let Some(output_dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(output_dir);
        }
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_fail_on_empty(mut self, fail_on_empty: bool) -> Self {
        self.fail_on_empty = fail_on_empty;
        self
    }

    pub fn with_min_success_rate(mut self, rate: f64) -> Self {
        self.min_success_rate = rate;
        self
    }

    /// Extension with any leading dot removed
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(JrdbError::configuration("workers must be at least 1"));
        }
        if self.normalized_extension().is_empty() {
            return Err(JrdbError::configuration("extension must not be empty"));
        }
        if !(0.0..=100.0).contains(&self.min_success_rate) {
            return Err(JrdbError::configuration(format!(
                "min_success_rate must be between 0 and 100, got {}",
                self.min_success_rate
            )));
        }
        Ok(())
    }
}
