//! Table-of-contents normalization.
//!
//! Turns the raw TOC entries reported by the document reader into a
//! canonical ordered sequence of titles, and decides once per document
//! whether the TOC carries outline numbering. The decision is a whole
//! document property: either every entry is treated as numbered or none is.

use crate::cleaner::CleanupConfig;
use crate::error::{Error, Result};
use crate::reader::TocEntry;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Leading outline numbering: "1 ", "1. ", "1.2 ", "1.2.3. " etc.
    static ref NUMBERING: Regex =
        Regex::new(r"^(\d+(?:\.\d+)*)\.?\s+(.*)$").expect("numbering pattern is valid");

    /// One unit of trailing furniture glued onto unnumbered titles: a page
    /// number or digit chain ("Summary 12", "Introduction3.") or a
    /// run-together uppercase word, typically the start of the next heading
    /// ("My TitleNEXT HEADING").
    static ref TRAILING_FURNITURE: Regex =
        Regex::new(r"[\s.]*(?:\d+(?:\.\d+)*\.?|[A-Z]+)\s*$").expect("suffix pattern is valid");
}

/// Fraction of non-empty TOC titles that must carry a leading numbering
/// pattern before the document counts as numbered.
pub const DEFAULT_NUMBERING_THRESHOLD: f64 = 0.5;

/// Whether the document's TOC carries outline numbering.
///
/// Selected once per document and passed explicitly to the splitter, the
/// repair stage and the hierarchy builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingMode {
    /// Titles carry numbering paths such as "1.2"
    Numbered,
    /// Titles carry no usable numbering; matching is approximate and the
    /// hierarchy degenerates to a flat forest
    None,
}

impl NumberingMode {
    /// True for [`NumberingMode::Numbered`].
    pub fn is_numbered(&self) -> bool {
        matches!(self, NumberingMode::Numbered)
    }
}

/// A normalized TOC title with its parsed numbering path.
///
/// `numbering` is empty when the document is unnumbered, or when a single
/// entry inside a numbered document failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedTitle {
    /// Outline numbering path, e.g. `[1, 2]` for "1.2"
    pub numbering: Vec<u32>,

    /// Title text with any leading numbering removed
    pub title: String,

    /// 1-based page number from the TOC entry
    pub page: usize,
}

impl NumberedTitle {
    /// Render the numbering path as its dotted display form ("1.2").
    pub fn numbering_label(&self) -> String {
        numbering_label(&self.numbering)
    }
}

/// Render a numbering path as its dotted display form.
pub fn numbering_label(numbering: &[u32]) -> String {
    numbering
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a title into its leading numbering path and remainder, when present.
pub fn parse_numbering(title: &str) -> Option<(Vec<u32>, &str)> {
    let caps = NUMBERING.captures(title)?;
    let path: Option<Vec<u32>> = caps
        .get(1)
        .map(|m| m.as_str())?
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    path.map(|p| (p, rest))
}

/// Normalize raw TOC entries into titles plus the document numbering mode.
///
/// Titles are cleaned before detection. A document counts as numbered when
/// at least `threshold` of its non-empty cleaned titles begin with a
/// numeral-dot pattern. In the unnumbered case, trailing digit chains
/// (page-number furniture glued onto the title by the extractor) are
/// stripped from each title.
///
/// # Errors
///
/// [`Error::EmptyToc`] when the TOC is empty or every entry cleans to an
/// empty string. Callers treat this as recoverable and continue with an
/// empty title sequence.
pub fn normalize_toc(
    entries: &[TocEntry],
    cleaner: &CleanupConfig,
    threshold: f64,
) -> Result<(Vec<NumberedTitle>, NumberingMode)> {
    let cleaned: Vec<(String, usize)> = entries
        .iter()
        .map(|e| (cleaner.clean(&e.title), e.page))
        .collect();

    let non_empty = cleaned.iter().filter(|(t, _)| !t.is_empty()).count();
    if non_empty == 0 {
        return Err(Error::EmptyToc);
    }

    let numbered = cleaned
        .iter()
        .filter(|(t, _)| !t.is_empty() && NUMBERING.is_match(t))
        .count();
    let fraction = numbered as f64 / non_empty as f64;
    let mode = if fraction >= threshold {
        NumberingMode::Numbered
    } else {
        NumberingMode::None
    };
    log::debug!(
        "TOC normalization: {}/{} titles numbered ({:.2}), mode {:?}",
        numbered,
        non_empty,
        fraction,
        mode
    );

    let titles = cleaned
        .into_iter()
        .map(|(title, page)| match mode {
            NumberingMode::Numbered => {
                let parsed = parse_numbering(&title)
                    .map(|(numbering, rest)| (numbering, rest.trim().to_string()));
                match parsed {
                    Some((numbering, title)) => NumberedTitle {
                        numbering,
                        title,
                        page,
                    },
                    None => {
                        log::debug!("TOC title without parseable numbering: '{}'", title);
                        NumberedTitle {
                            numbering: Vec::new(),
                            title,
                            page,
                        }
                    },
                }
            },
            NumberingMode::None => NumberedTitle {
                numbering: Vec::new(),
                title: strip_title_furniture(&title),
                page,
            },
        })
        .collect();

    Ok((titles, mode))
}

/// Strip trailing furniture (digit chains and uppercase runs) from an
/// unnumbered title, one unit at a time, keeping the title unchanged when
/// the furniture is all there is.
fn strip_title_furniture(title: &str) -> String {
    let mut current = title.trim().to_string();
    loop {
        let stripped = TRAILING_FURNITURE.replace(&current, "").trim().to_string();
        if stripped.is_empty() || stripped == current {
            return current;
        }
        current = stripped;
    }
}
