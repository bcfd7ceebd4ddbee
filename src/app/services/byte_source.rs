//! Feed file access: name convention and text decoding
//!
//! JRDB distributes feeds as CP932 (Shift_JIS with Microsoft extensions).
//! Files re-saved as UTF-8 also turn up, so decoding falls back to UTF-8
//! when CP932 reports errors and the bytes are valid UTF-8.

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use regex::{Regex, RegexBuilder};
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::FILE_DATE_DIGITS;
use crate::{JrdbError, Result};

/// Character set a file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    Cp932,
    Utf8,
}

/// Decoded file content
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: SourceEncoding,
    /// Undecodable byte sequences were replaced with U+FFFD
    pub had_replacements: bool,
}

/// Decode raw feed bytes, preferring CP932
pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if !had_errors {
        return DecodedText {
            text: text.into_owned(),
            encoding: SourceEncoding::Cp932,
            had_replacements: false,
        };
    }

    // A UTF-8 BOM is not part of the first record
    let unmarked = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) if encoding == UTF_8 => &bytes[bom_length..],
        _ => bytes,
    };
    if let Ok(utf8) = std::str::from_utf8(unmarked) {
        debug!("Content is not CP932, decoded as UTF-8");
        return DecodedText {
            text: utf8.to_string(),
            encoding: SourceEncoding::Utf8,
            had_replacements: false,
        };
    }

    warn!("CP932 decode errors detected; some characters were replaced with U+FFFD");
    DecodedText {
        text: text.into_owned(),
        encoding: SourceEncoding::Cp932,
        had_replacements: true,
    }
}

/// Read and decode a feed file
pub async fn read_decoded(path: &Path) -> Result<DecodedText> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| JrdbError::io(format!("Failed to read {}", path.display()), e))?;
    Ok(decode_bytes(&bytes))
}

/// Matcher for `<TAG><YYMMDD>.<ext>` file names
#[derive(Debug, Clone)]
pub struct FeedFileName {
    pattern: Regex,
}

impl FeedFileName {
    /// Build a matcher for the given extension (without the dot)
    pub fn new(extension: &str) -> Result<Self> {
        let extension = extension.trim_start_matches('.');
        let pattern = RegexBuilder::new(&format!(
            r"^([A-Z]{{2,3}})\d{{{}}}\.{}$",
            FILE_DATE_DIGITS,
            regex::escape(extension)
        ))
        .case_insensitive(true)
        .build()
        .map_err(|e| JrdbError::configuration(format!("Invalid extension '{}': {}", extension, e)))?;
        Ok(Self { pattern })
    }

    /// Uppercase format tag from the base name of `path`, if it follows the convention
    pub fn extract_tag(&self, path: &Path) -> Option<String> {
        let basename = path.file_name()?.to_str()?;
        self.pattern
            .captures(basename)
            .and_then(|captures| captures.get(1))
            .map(|tag| tag.as_str().to_ascii_uppercase())
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.extract_tag(path).is_some()
    }
}
