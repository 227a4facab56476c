//! Document reader collaborator contract.
//!
//! Low-level parsing (page text extraction, raw TOC retrieval, metadata) is
//! delegated to an external document-reading library. This module defines
//! the trait that library must satisfy, plus an in-memory implementation
//! used in tests and by embedders that already hold extracted content.

use crate::error::Result;
use indexmap::IndexMap;

/// A raw table-of-contents entry as reported by the document reader.
///
/// Entries are immutable once read; the pipeline derives its own working
/// types from them and never mutates the reader's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Nesting level reported by the document (1-based)
    pub level: usize,

    /// Raw title text, possibly carrying numbering and extraction noise
    pub title: String,

    /// 1-based page number the entry points at
    pub page: usize,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(level: usize, title: impl Into<String>, page: usize) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// Document metadata mapping. Values may be absent (`None`) when the
/// underlying document does not carry the field.
pub type Metadata = IndexMap<String, Option<String>>;

/// Contract for the external document-parsing collaborator.
///
/// Implementations wrap a concrete parsing library and expose the three
/// reads the pipeline needs. Each method may fail independently; only a
/// failure of [`get_pages`](DocumentReader::get_pages) is fatal for the
/// document (see the extractor's degradation rules).
pub trait DocumentReader {
    /// Page text strings in document order. May be empty.
    fn get_pages(&self) -> Result<Vec<String>>;

    /// Raw table-of-contents entries in document order. May be empty.
    fn get_toc(&self) -> Result<Vec<TocEntry>>;

    /// Document metadata. Expected keys include `title`, `author`,
    /// `creation_date` and `producer`; any may be absent or empty.
    fn get_metadata(&self) -> Result<Metadata>;
}

/// A [`DocumentReader`] over content that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReader {
    pages: Vec<String>,
    toc: Vec<TocEntry>,
    metadata: Metadata,
}

impl InMemoryReader {
    /// Create an empty in-memory reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page texts.
    pub fn with_pages(mut self, pages: Vec<String>) -> Self {
        self.pages = pages;
        self
    }

    /// Set the TOC entries.
    pub fn with_toc(mut self, toc: Vec<TocEntry>) -> Self {
        self.toc = toc;
        self
    }

    /// Set a metadata field.
    pub fn with_metadata_field(
        mut self,
        key: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        self.metadata.insert(key.into(), value.map(Into::into));
        self
    }
}

impl DocumentReader for InMemoryReader {
    fn get_pages(&self) -> Result<Vec<String>> {
        Ok(self.pages.clone())
    }

    fn get_toc(&self) -> Result<Vec<TocEntry>> {
        Ok(self.toc.clone())
    }

    fn get_metadata(&self) -> Result<Metadata> {
        Ok(self.metadata.clone())
    }
}
