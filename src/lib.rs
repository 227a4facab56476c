//! # doc_outline
//!
//! Reconstructs a document's nested section structure from its flat text
//! stream and an unreliable table of contents.
//!
//! Low-level parsing (page text, raw TOC entries, metadata) is delegated to
//! an external reader behind the [`DocumentReader`] trait. This crate owns
//! the hard part: normalizing noisy, partially numbered TOC metadata,
//! locating section boundaries in an undifferentiated text blob, repairing
//! broken numbering sequences, and folding the flat section list into a
//! clean hierarchy.
//!
//! ## Pipeline
//!
//! 1. **TOC normalization** ([`toc`]) - canonical titles plus a per-document
//!    numbering mode.
//! 2. **Section splitting** ([`splitter`]) - exact forward search for
//!    numbered documents, approximate word-window matching for unnumbered
//!    ones.
//! 3. **Repair** ([`repair`]) - numbering continuity restoration, title-echo
//!    stripping, deduplication.
//! 4. **Hierarchy** ([`hierarchy`]) - stack-based forest construction with
//!    orphan re-attachment and empty-node pruning.
//!
//! The [`cleaner`] rules apply throughout, and every stage degrades rather
//! than aborts: a document without a usable TOC still yields metadata and
//! cleaned full text.
//!
//! ## Quick start
//!
//! ```
//! use doc_outline::{DocumentExtractor, ExtractorConfig, InMemoryReader, TocEntry};
//!
//! # fn main() -> doc_outline::Result<()> {
//! let reader = InMemoryReader::new()
//!     .with_pages(vec!["1. Introduction intro body 2. Methods methods body".into()])
//!     .with_toc(vec![
//!         TocEntry::new(1, "1. Introduction", 1),
//!         TocEntry::new(1, "2. Methods", 1),
//!     ]);
//!
//! let doc = DocumentExtractor::new(ExtractorConfig::default()).extract_all(&reader)?;
//! assert_eq!(doc.processed_text["1. Introduction"], "intro body");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// External collaborator contract
pub mod reader;

// Text cleaning utility
pub mod cleaner;

// Pipeline stages
pub mod hierarchy;
pub mod repair;
pub mod similarity;
pub mod splitter;
pub mod toc;

// Pipeline orchestration
pub mod extractor;

// Re-exports
pub use cleaner::CleanupConfig;
pub use error::{Error, Result};
pub use extractor::{DocumentExtractor, ExtractedDocument, ExtractorConfig};
pub use hierarchy::HierarchyNode;
pub use reader::{DocumentReader, InMemoryReader, Metadata, TocEntry};
pub use similarity::{LevenshteinMatcher, TitleMatcher};
pub use splitter::Section;
pub use toc::{NumberedTitle, NumberingMode};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
