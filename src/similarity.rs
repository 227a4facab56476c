//! Pluggable string-similarity strategies for approximate title matching.
//!
//! Unnumbered documents render their section headings with extraction noise
//! (line breaks inside titles, stray characters, case changes). The splitter
//! compares normalized candidate windows against normalized titles through
//! the [`TitleMatcher`] trait so the scoring rule and threshold stay
//! swappable and testable on their own.

/// Similarity threshold a candidate window must reach to count as a title
/// occurrence.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.82;

/// Strategy for scoring how alike two normalized strings are.
///
/// Scores are in `[0.0, 1.0]`, `1.0` meaning identical.
pub trait TitleMatcher {
    /// Score the similarity of two already-normalized strings.
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Default matcher: normalized Levenshtein distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinMatcher;

impl TitleMatcher for LevenshteinMatcher {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

/// Normalize a string for approximate comparison: lowercase, strip
/// punctuation, collapse whitespace runs to single spaces.
pub fn normalize_for_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else if ch.is_alphanumeric() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.extend(ch.to_lowercase());
        }
        // punctuation is dropped without breaking the word
    }
    out
}
