//! The document extraction pipeline.
//!
//! Composes the TOC normalizer, section splitter, repair stage and
//! hierarchy builder into a single run over one document, with the text
//! cleaner applied to both section text and the whole-document text. Every
//! stage catches its own failures, logs them with enough context to
//! diagnose, and hands the best available value to the next stage; only an
//! unreadable document aborts the run.

use crate::cleaner::CleanupConfig;
use crate::error::Result;
use crate::hierarchy::{build_forest, forest_to_map, HierarchyNode};
use crate::reader::DocumentReader;
use crate::repair::repair_sections;
use crate::similarity::{LevenshteinMatcher, TitleMatcher, DEFAULT_SIMILARITY_THRESHOLD};
use crate::splitter::{split_sections, Section};
use crate::toc::{
    normalize_toc, numbering_label, NumberedTitle, NumberingMode, DEFAULT_NUMBERING_THRESHOLD,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Tunable parameters of a pipeline run.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Fraction of non-empty TOC titles that must carry numbering for the
    /// document to count as numbered
    pub numbering_threshold: f64,

    /// Similarity a candidate window must reach in approximate matching
    pub similarity_threshold: f64,

    /// Sections whose body has at most this many non-digit characters are
    /// treated as empty; 0 disables the check
    pub min_body_chars: usize,

    /// Text cleanup rules applied to titles, section text and the whole
    /// document text
    pub cleanup: CleanupConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorConfig {
    /// Create a configuration with default thresholds and identity cleanup.
    pub fn new() -> Self {
        Self {
            numbering_threshold: DEFAULT_NUMBERING_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_body_chars: 0,
            cleanup: CleanupConfig::default(),
        }
    }

    /// Set the numbered-TOC detection threshold.
    pub fn with_numbering_threshold(mut self, threshold: f64) -> Self {
        self.numbering_threshold = threshold;
        self
    }

    /// Set the approximate-matching similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the short-body suppression threshold (0 disables).
    pub fn with_min_body_chars(mut self, min_chars: usize) -> Self {
        self.min_body_chars = min_chars;
        self
    }

    /// Set the text cleanup rules.
    pub fn with_cleanup(mut self, cleanup: CleanupConfig) -> Self {
        self.cleanup = cleanup;
        self
    }
}

/// Structured result of one document run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    /// Document metadata, cleaned of absent values
    pub metadata: IndexMap<String, String>,

    /// Nested section hierarchy: leaf keys map to cleaned text, parent keys
    /// map to mappings of their children (body text under "introduction").
    /// Empty when the TOC was absent or unusable.
    pub leveled_text: Map<String, Value>,

    /// Flat title -> cleaned section text mapping in TOC order, before
    /// hierarchy grouping. Empty when the TOC was absent or unusable.
    pub processed_text: IndexMap<String, String>,

    /// The full document text with cleanup applied
    pub cleaned_text: String,
}

impl ExtractedDocument {
    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One-document extraction pipeline.
///
/// Owns the run configuration and the title-matching strategy. Each call to
/// [`extract_all`](DocumentExtractor::extract_all) works on fresh state, so
/// independent extractors may run in parallel over different documents
/// without any coordination.
pub struct DocumentExtractor {
    config: ExtractorConfig,
    matcher: Box<dyn TitleMatcher>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl DocumentExtractor {
    /// Create an extractor with the given configuration and the default
    /// Levenshtein title matcher.
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            matcher: Box::new(LevenshteinMatcher),
        }
    }

    /// Replace the approximate title-matching strategy.
    pub fn with_matcher(mut self, matcher: Box<dyn TitleMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Run the full pipeline over one document.
    ///
    /// # Errors
    ///
    /// Fails only when the reader cannot produce page text (the document is
    /// unreadable). TOC, metadata and per-section failures degrade: the
    /// result always carries `metadata` and `cleaned_text`, while
    /// `leveled_text` and `processed_text` are empty when no usable TOC was
    /// found.
    pub fn extract_all(&self, reader: &dyn DocumentReader) -> Result<ExtractedDocument> {
        // Stage 0: page text. The only fatal read.
        let pages = reader.get_pages()?;
        let full_text = pages.join("\n");
        let cleaned_text = self.config.cleanup.clean(&full_text);

        let metadata = self.read_metadata(reader);

        // Stage 1: TOC normalization.
        let (titles, mode) = self.read_toc(reader);
        if titles.is_empty() {
            return Ok(ExtractedDocument {
                metadata,
                leveled_text: Map::new(),
                processed_text: IndexMap::new(),
                cleaned_text,
            });
        }

        // Stage 2: section splitting over the cleaned text.
        let sections = split_sections(
            &cleaned_text,
            &titles,
            mode,
            self.matcher.as_ref(),
            self.config.similarity_threshold,
        );

        // A TOC that lost its numbering may have had it recovered from the
        // text during splitting; handle the document as numbered from here on.
        let mode = if !mode.is_numbered() && sections.iter().any(|s| !s.numbering.is_empty()) {
            log::debug!("Outline numbering recovered from text, switching to numbered handling");
            NumberingMode::Numbered
        } else {
            mode
        };

        // Stage 3: numbering and title repair.
        let sections = repair_sections(sections, mode, self.config.min_body_chars);

        let processed_text = flat_sections(&sections);

        // Stage 4: hierarchy construction.
        let forest: Vec<HierarchyNode> = build_forest(&sections, mode);
        let leveled_text = forest_to_map(&forest);

        Ok(ExtractedDocument {
            metadata,
            leveled_text,
            processed_text,
            cleaned_text,
        })
    }

    /// Metadata read with degradation: a failed read logs and yields an
    /// empty mapping; absent and empty values are dropped.
    fn read_metadata(&self, reader: &dyn DocumentReader) -> IndexMap<String, String> {
        match reader.get_metadata() {
            Ok(metadata) => metadata
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Some(v) if !v.is_empty() => Some((key, v)),
                    _ => None,
                })
                .collect(),
            Err(e) => {
                log::error!("Metadata extraction failed: {}", e);
                IndexMap::new()
            },
        }
    }

    /// TOC read plus normalization with degradation: any failure logs and
    /// yields an empty title sequence, which downgrades the run to cleaned
    /// text and metadata only.
    fn read_toc(&self, reader: &dyn DocumentReader) -> (Vec<NumberedTitle>, NumberingMode) {
        let entries = match reader.get_toc() {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("TOC retrieval failed: {}", e);
                return (Vec::new(), NumberingMode::None);
            },
        };
        match normalize_toc(&entries, &self.config.cleanup, self.config.numbering_threshold) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("TOC normalization failed, output will be degraded: {}", e);
                (Vec::new(), NumberingMode::None)
            },
        }
    }
}

/// Flat title -> text mapping in section order.
fn flat_sections(sections: &[Section]) -> IndexMap<String, String> {
    sections
        .iter()
        .map(|section| (section_key(section), section.raw_text.clone()))
        .collect()
}

/// Canonical display key for a section: `"1.2. Title"` when numbered,
/// otherwise the bare title.
fn section_key(section: &Section) -> String {
    let label = numbering_label(&section.numbering);
    if label.is_empty() {
        section.title.clone()
    } else if section.title.is_empty() {
        format!("{}.", label)
    } else {
        format!("{}. {}", label, section.title)
    }
}
