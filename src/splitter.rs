//! Section splitting.
//!
//! Segments the full concatenated document text into one contiguous raw text
//! block per TOC title. Two boundary-search algorithms are selected by the
//! document's numbering mode: exact substring search for numbered documents,
//! sliding word-window approximate matching for unnumbered ones. Both scan
//! strictly forward; a title that cannot be located yields an empty section
//! and leaves the search cursor where it was.

use crate::similarity::{normalize_for_match, TitleMatcher};
use crate::toc::{NumberedTitle, NumberingMode};

/// One raw text block per (repaired) TOC entry.
///
/// `raw_text` is the verbatim text between this section's start boundary and
/// the next located section's start boundary, trimmed at both ends. It is
/// empty when the title could not be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Outline numbering path; empty for unnumbered documents
    pub numbering: Vec<u32>,

    /// Title text without numbering
    pub title: String,

    /// Body text between this title and the next located title
    pub raw_text: String,
}

/// Byte span of a located title occurrence in the full text.
type TitleSpan = Option<(usize, usize)>;

/// Split the full document text into sections, one per TOC title, in TOC
/// order regardless of match success.
pub fn split_sections(
    full_text: &str,
    titles: &[NumberedTitle],
    mode: NumberingMode,
    matcher: &dyn TitleMatcher,
    similarity_threshold: f64,
) -> Vec<Section> {
    match mode {
        NumberingMode::Numbered => {
            let spans = locate_exact(full_text, titles);
            assemble(full_text, titles, &spans)
        },
        NumberingMode::None => {
            split_unnumbered(full_text, titles, matcher, similarity_threshold)
        },
    }
}

/// Split an unnumbered document, recovering outline numbering from the text
/// where possible.
///
/// TOCs sometimes lose the numbering that the body text still carries. When
/// the token directly before a matched title parses as a numbering
/// rendering ("2", "2.", "1.2."), it is taken as that section's numbering
/// and folded into the heading span. Recovery is all or nothing: it applies
/// only when every located title has such a token, so a stray number in
/// running prose before a single heading cannot fabricate an outline.
fn split_unnumbered(
    full_text: &str,
    titles: &[NumberedTitle],
    matcher: &dyn TitleMatcher,
    threshold: f64,
) -> Vec<Section> {
    let (mut spans, recovered) = locate_fuzzy(full_text, titles, matcher, threshold);

    let located = spans.iter().filter(|s| s.is_some()).count();
    let accept = located > 0
        && spans
            .iter()
            .zip(&recovered)
            .filter(|(span, _)| span.is_some())
            .all(|(_, rec)| rec.is_some());

    if accept {
        log::debug!("Recovered outline numbering for {} unnumbered titles", located);
        for (span, rec) in spans.iter_mut().zip(&recovered) {
            if let (Some((start, _)), Some((_, token_start))) = (span.as_mut(), rec) {
                *start = *token_start;
            }
        }
    }

    let mut sections = assemble(full_text, titles, &spans);
    if accept {
        for (section, rec) in sections.iter_mut().zip(recovered) {
            if let Some((numbering, _)) = rec {
                section.numbering = numbering;
            }
        }
    }
    sections
}

/// Parse a standalone numbering rendering such as "2", "2." or "1.2.".
fn parse_numbering_token(token: &str) -> Option<Vec<u32>> {
    let body = token.strip_suffix('.').unwrap_or(token);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    body.split('.').map(|part| part.parse::<u32>().ok()).collect()
}

/// Exact monotonic forward search for each rendered title.
///
/// Tries the numbered renderings first ("1.2 Title", "1.2. Title") so a bare
/// title that also occurs in running text cannot steal the boundary, then
/// falls back to the bare title.
fn locate_exact(full_text: &str, titles: &[NumberedTitle]) -> Vec<TitleSpan> {
    let mut spans = Vec::with_capacity(titles.len());
    let mut cursor = 0usize;

    for entry in titles {
        let label = entry.numbering_label();
        let mut candidates: Vec<String> = Vec::new();
        if !label.is_empty() && !entry.title.is_empty() {
            candidates.push(format!("{} {}", label, entry.title));
            candidates.push(format!("{}. {}", label, entry.title));
        }
        if !entry.title.is_empty() {
            candidates.push(entry.title.clone());
        }

        let hit = candidates.iter().find_map(|candidate| {
            full_text[cursor..]
                .find(candidate.as_str())
                .map(|idx| (cursor + idx, cursor + idx + candidate.len()))
        });

        match hit {
            Some((start, end)) => {
                cursor = end;
                spans.push(Some((start, end)));
            },
            None => {
                log::warn!(
                    "Section splitter: title '{}' not found after offset {}",
                    entry.title,
                    cursor
                );
                spans.push(None);
            },
        }
    }

    spans
}

/// Numbering recovered for a fuzzily located title: the parsed path plus
/// the byte offset of the numbering token.
type RecoveredNumbering = Option<(Vec<u32>, usize)>;

/// Approximate forward search: slide a word window over the tokenized text
/// and score each window against the normalized title. The window width is
/// the title's token count, also tried one token wider and narrower to
/// tolerate line breaks and stray characters inside the rendered heading.
///
/// For each located title, the token directly before the match (when not
/// already consumed by an earlier title) is offered as a recovered
/// numbering.
fn locate_fuzzy(
    full_text: &str,
    titles: &[NumberedTitle],
    matcher: &dyn TitleMatcher,
    threshold: f64,
) -> (Vec<TitleSpan>, Vec<RecoveredNumbering>) {
    let tokens = tokenize(full_text);
    let mut spans = Vec::with_capacity(titles.len());
    let mut recovered: Vec<RecoveredNumbering> = Vec::with_capacity(titles.len());
    let mut cursor_token = 0usize;

    for entry in titles {
        let target = normalize_for_match(&entry.title);
        if target.is_empty() {
            log::warn!("Section splitter: title '{}' normalizes to nothing", entry.title);
            spans.push(None);
            recovered.push(None);
            continue;
        }
        let width = target.split(' ').count();
        let floor = cursor_token;

        let mut found: TitleSpan = None;
        let mut numbering: RecoveredNumbering = None;
        'scan: for start in floor..tokens.len() {
            let mut best: Option<(f64, usize)> = None;
            for w in window_widths(width) {
                if start + w > tokens.len() {
                    continue;
                }
                let candidate = window_text(full_text, &tokens, start, w);
                let score = matcher.similarity(&target, &candidate);
                if score >= threshold && best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, w));
                }
            }
            if let Some((_, w)) = best {
                found = Some((tokens[start].0, tokens[start + w - 1].1));
                if start > floor {
                    let (tok_start, tok_end) = tokens[start - 1];
                    numbering = parse_numbering_token(&full_text[tok_start..tok_end])
                        .map(|path| (path, tok_start));
                }
                cursor_token = start + w;
                break 'scan;
            }
        }

        if found.is_none() {
            log::warn!(
                "Section splitter: no approximate match for title '{}' after token {}",
                entry.title,
                cursor_token
            );
        }
        spans.push(found);
        recovered.push(numbering);
    }

    (spans, recovered)
}

/// Candidate window widths for a title of `width` tokens.
fn window_widths(width: usize) -> Vec<usize> {
    let mut widths = vec![width, width + 1];
    if width > 1 {
        widths.push(width - 1);
    }
    widths
}

/// Normalized text of the window spanning `count` tokens from `start`.
fn window_text(full_text: &str, tokens: &[(usize, usize)], start: usize, count: usize) -> String {
    let begin = tokens[start].0;
    let end = tokens[start + count - 1].1;
    normalize_for_match(&full_text[begin..end])
}

/// Byte ranges of whitespace-separated tokens.
fn tokenize(text: &str) -> Vec<(usize, usize)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        tokens.push((s, text.len()));
    }
    tokens
}

/// Cut section bodies out of the full text: each located title owns the span
/// from the end of its occurrence to the start of the next located one.
fn assemble(full_text: &str, titles: &[NumberedTitle], spans: &[TitleSpan]) -> Vec<Section> {
    let mut sections = Vec::with_capacity(titles.len());

    for (i, entry) in titles.iter().enumerate() {
        let raw_text = match spans[i] {
            Some((_, body_start)) => {
                let body_end = spans[i + 1..]
                    .iter()
                    .find_map(|s| s.map(|(start, _)| start))
                    .unwrap_or(full_text.len());
                full_text[body_start..body_end].trim().to_string()
            },
            None => String::new(),
        };
        sections.push(Section {
            numbering: entry.numbering.clone(),
            title: entry.title.clone(),
            raw_text,
        });
    }

    sections
}
