//! Numbering and title repair.
//!
//! Fixes non-monotonic or gapped numbering sequences left behind by TOC
//! typos, strips a section's own heading when it leaks into the start of its
//! body text, merges duplicated entries, and optionally suppresses bodies
//! too short to be real prose. Repair is purely numeric continuity
//! restoration: it never reorders or drops sections.

use crate::splitter::Section;
use crate::toc::{numbering_label, NumberingMode};

/// Body length (in non-digit characters) below which a section is treated
/// as having no body text. Matches the furniture threshold observed in
/// scanned reports; disabled by default in the extractor configuration.
pub const SUGGESTED_MIN_BODY_CHARS: usize = 50;

/// Run the full repair stage for the given mode.
///
/// Sequence repair, title-echo stripping and deduplication only apply to
/// numbered documents; short-body suppression applies to both modes when
/// `min_body_chars` is nonzero.
pub fn repair_sections(
    mut sections: Vec<Section>,
    mode: NumberingMode,
    min_body_chars: usize,
) -> Vec<Section> {
    if mode.is_numbered() {
        repair_numbering(&mut sections);
        for section in &mut sections {
            strip_title_echo(section);
        }
        sections = dedup_sections(sections);
    }
    if min_body_chars > 0 {
        suppress_short_bodies(&mut sections, min_body_chars);
    }
    sections
}

/// Restore numeric continuity of the numbering paths, in place.
///
/// A path is legal after its repaired predecessor `prev` when it is either
/// the first child `prev + [1]` or the sibling successor of some prefix of
/// `prev` (last component incremented, nothing after it). Everything else is
/// rewritten: a jump deeper than one level clamps to the minimal implied
/// child, and a gapped or backwards sibling becomes the arithmetic successor
/// at its own depth. Entries with no parsed numbering are skipped and do not
/// move the predecessor.
pub fn repair_numbering(sections: &mut [Section]) {
    let mut prev: Option<(Vec<u32>, String)> = None;

    for section in sections.iter_mut() {
        if section.numbering.is_empty() {
            continue;
        }
        let repaired = match &prev {
            None => section.numbering.clone(),
            Some((prev_path, prev_title)) => {
                // An exact repeat of the previous entry is a duplicate, not
                // a typo; leave it for deduplication to merge.
                let duplicate =
                    *prev_path == section.numbering && *prev_title == section.title;
                if duplicate || is_legal_successor(prev_path, &section.numbering) {
                    section.numbering.clone()
                } else {
                    let fixed = successor_at_depth(prev_path, section.numbering.len());
                    log::debug!(
                        "Numbering repair: '{}' rewritten {} -> {}",
                        section.title,
                        numbering_label(&section.numbering),
                        numbering_label(&fixed)
                    );
                    fixed
                }
            },
        };
        section.numbering = repaired.clone();
        prev = Some((repaired, section.title.clone()));
    }
}

/// True when `cur` may directly follow `prev` in a well-formed outline.
fn is_legal_successor(prev: &[u32], cur: &[u32]) -> bool {
    if cur.len() == prev.len() + 1 {
        // First child: 1.2 -> 1.2.1
        return cur[..prev.len()] == *prev && cur[prev.len()] == 1;
    }
    if cur.len() <= prev.len() && !cur.is_empty() {
        // Sibling successor at any open depth: 1.2.3 -> 1.2.4, 1.3, or 2
        let d = cur.len();
        return cur[..d - 1] == prev[..d - 1] && cur[d - 1] == prev[d - 1] + 1;
    }
    false
}

/// The arithmetically correct path at `depth` following `prev`.
fn successor_at_depth(prev: &[u32], depth: usize) -> Vec<u32> {
    if depth > prev.len() {
        // Deep jump: open the minimal implied child instead.
        let mut path = prev.to_vec();
        path.push(1);
        path
    } else {
        let mut path = prev[..depth].to_vec();
        path[depth - 1] += 1;
        path
    }
}

/// Strip the section's own heading from the start of the body text when the
/// splitter's boundary left it there, in place.
///
/// Only a verbatim occurrence of the title (optionally preceded by its
/// numbering rendering) is removed, and only when a word boundary follows.
/// Body text that merely shares a prefix with the title is left alone.
pub fn strip_title_echo(section: &mut Section) {
    if section.raw_text.is_empty() || section.title.is_empty() {
        return;
    }
    let label = numbering_label(&section.numbering);
    let mut candidates: Vec<String> = Vec::new();
    if !label.is_empty() {
        candidates.push(format!("{}. {}", label, section.title));
        candidates.push(format!("{} {}", label, section.title));
    }
    candidates.push(section.title.clone());

    for candidate in &candidates {
        if let Some(rest) = strip_exact_prefix(&section.raw_text, candidate) {
            section.raw_text = rest;
            return;
        }
    }

    // The body may still open with the numbering as originally rendered,
    // which repair has since rewritten. Skip a leading digit-dot run and try
    // the bare title once more.
    let stripped = {
        let trimmed = section.raw_text.trim_start();
        let skip = trimmed
            .find(|c: char| !c.is_ascii_digit() && c != '.' && !c.is_whitespace())
            .unwrap_or(0);
        if skip > 0 {
            strip_exact_prefix(&trimmed[skip..], &section.title)
        } else {
            None
        }
    };
    if let Some(rest) = stripped {
        section.raw_text = rest;
    }
}

/// When `candidate` occurs verbatim at the start of `text` (leading
/// whitespace ignored) and a word boundary follows, return the remaining
/// text.
fn strip_exact_prefix(text: &str, candidate: &str) -> Option<String> {
    let rest = text.trim_start().strip_prefix(candidate)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(rest.trim_start().to_string()),
    }
}

/// Merge adjacent sections that repaired to an identical numbering and
/// title, concatenating first then second.
pub fn dedup_sections(sections: Vec<Section>) -> Vec<Section> {
    let mut out: Vec<Section> = Vec::with_capacity(sections.len());
    for section in sections {
        match out.last_mut() {
            Some(last)
                if last.numbering == section.numbering && last.title == section.title =>
            {
                log::debug!("Deduplicating repeated section '{}'", section.title);
                if last.raw_text.is_empty() {
                    last.raw_text = section.raw_text;
                } else if !section.raw_text.is_empty() {
                    last.raw_text.push(' ');
                    last.raw_text.push_str(&section.raw_text);
                }
            },
            _ => out.push(section),
        }
    }
    out
}

/// Blank out bodies whose non-digit content is at most `min_chars` long.
/// Stray page numbers and outline fragments routinely masquerade as body
/// text in scanned documents.
pub fn suppress_short_bodies(sections: &mut [Section], min_chars: usize) {
    for section in sections.iter_mut() {
        let meaningful = section
            .raw_text
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != '.' && !c.is_whitespace())
            .count();
        if meaningful <= min_chars && !section.raw_text.is_empty() {
            log::debug!(
                "Suppressing short body of '{}' ({} meaningful chars)",
                section.title,
                meaningful
            );
            section.raw_text.clear();
        }
    }
}
