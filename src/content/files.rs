//! Attached files and the resource limit applied to their text extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::ContentItem;
use crate::search::errors::SearchError;

/// MIME type whose body text is extracted into the article
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file attached to a content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: PathBuf,
    /// Human-readable metadata summary (name, type, size, caption)
    pub meta_card: String,
}

impl AttachedFile {
    #[inline]
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
    }
}

/// Lists the files attached to an item
pub trait FileStore: Send + Sync {
    fn files(&self, item: &dyn ContentItem) -> Vec<AttachedFile>;
}

/// Extracts body text from a PDF on disk
pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> anyhow::Result<String>;
}

/// Memory budget for one extraction pass, in bytes.
///
/// Files larger than a tenth of the ceiling are never handed to an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemoryCeiling(u64);

impl MemoryCeiling {
    /// 500 MiB
    pub const DEFAULT_FLOOR: MemoryCeiling = MemoryCeiling(500 * 1024 * 1024);

    #[must_use]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Raise this ceiling to at least `floor`
    #[must_use]
    pub fn raised_to(self, floor: MemoryCeiling) -> Self {
        self.max(floor)
    }

    /// Largest file size admitted for extraction
    #[must_use]
    pub const fn extraction_budget(self) -> u64 {
        self.0 / 10
    }

    #[must_use]
    pub const fn admits(self, size: u64) -> bool {
        size <= self.extraction_budget()
    }

    /// Parse a size such as `"500M"`, `"2g"`, `"640k"` or `"1048576"`
    pub fn parse(value: &str) -> Result<Self, SearchError> {
        let value = value.trim();
        let invalid = || SearchError::Config(format!("invalid memory size '{value}'"));

        let (digits, shift) = match value.chars().last().ok_or_else(invalid)? {
            'k' | 'K' => (&value[..value.len() - 1], 10),
            'm' | 'M' => (&value[..value.len() - 1], 20),
            'g' | 'G' => (&value[..value.len() - 1], 30),
            _ => (value, 0),
        };

        let base: u64 = digits.trim().parse().map_err(|_| invalid())?;
        base.checked_mul(1u64 << shift)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Default for MemoryCeiling {
    fn default() -> Self {
        Self::DEFAULT_FLOOR
    }
}

impl fmt::Display for MemoryCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemoryCeiling {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemoryCeiling {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MemoryCeiling> for String {
    fn from(ceiling: MemoryCeiling) -> Self {
        ceiling.to_string()
    }
}
