//! Error handling for JRDB parsing operations.
//!
//! Two layers of errors exist. [`JrdbError`] covers everything around the
//! parser (file access, configuration, sinks) and is propagated with `?`.
//! [`DecodeError`] and [`KeyError`] describe why a single line could not be
//! decoded; the file-level dispatcher logs them and moves on to the next line.

use std::path::PathBuf;
use thiserror::Error;

use crate::app::models::Layout;

#[derive(Error, Debug)]
pub enum JrdbError {
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("File name does not follow the <TAG><YYMMDD>.<ext> convention: {path}")]
    InvalidFileName { path: PathBuf },

    #[error("Unsupported format tag: {tag}")]
    UnsupportedFormat { tag: String },

    #[error("Sink failed to load {table}: {reason}")]
    Sink { table: String, reason: String },

    #[error("Directory traversal error: {0}")]
    DirectoryTraversal(#[from] walkdir::Error),

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl JrdbError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(tag: impl Into<String>) -> Self {
        Self::UnsupportedFormat { tag: tag.into() }
    }

    /// Create a sink error
    pub fn sink(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sink {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for JrdbError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, JrdbError>;

/// Structural problems with a race or meeting key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key '{key}' has length {actual}, expected {expected}")]
    WrongLength {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("key '{key}' has a non-numeric {component}: '{value}'")]
    InvalidComponent {
        key: String,
        component: &'static str,
        value: String,
    },
}

/// Reasons a single line is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{layout} line too short: {actual} characters, need at least {minimum}")]
    TooShort {
        layout: Layout,
        minimum: usize,
        actual: usize,
    },

    #[error("malformed key: {0}")]
    MalformedKey(#[from] KeyError),
}
