//! Configurable text cleaning.
//!
//! Applies a rule set loaded from a JSON file to strip boilerplate passages,
//! control markers and special characters from extracted text, then
//! normalizes whitespace. Cleaning runs to a fixpoint so the operation is
//! idempotent: `clean(clean(x)) == clean(x)` holds for every input.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::cmp::Reverse;
use std::path::Path;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
}

/// Text cleanup rules.
///
/// All three rule sets default to empty, which makes cleaning a pure
/// whitespace normalization. A missing or malformed configuration file
/// degrades to this identity behavior rather than aborting the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Literal characters removed unconditionally (e.g. bullets, soft hyphens)
    pub special_characters: Vec<String>,

    /// Literal markers removed unconditionally (e.g. form-feed sequences).
    /// Escape sequences arrive already unescaped from the JSON layer.
    pub expressions: Vec<String>,

    /// Known boilerplate passages removed wherever they occur verbatim,
    /// longest match first
    pub texts_to_remove: Vec<String>,
}

impl CleanupConfig {
    /// Create an empty rule set (identity cleaning).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rules from a JSON file, falling back to the identity rule set
    /// when the file is missing or malformed. The failure is logged, never
    /// propagated; a broken configuration must not abort document runs.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::try_load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Cleanup configuration unusable, cleaning disabled: {}", e);
                Self::default()
            },
        }
    }

    /// Load rules from a JSON file, reporting why the file was rejected.
    pub fn try_load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// True when no rule is configured and cleaning only normalizes whitespace.
    pub fn is_identity(&self) -> bool {
        self.special_characters.is_empty()
            && self.expressions.is_empty()
            && self.texts_to_remove.is_empty()
    }

    /// Clean a text: remove boilerplate passages (longest first), then
    /// marker expressions, then special characters, and only then collapse
    /// whitespace runs to single spaces with trimmed ends. The rules must
    /// see the raw text first: a whitespace-class marker such as a form
    /// feed would otherwise be collapsed into a plain space before removal
    /// could fire.
    ///
    /// The rule applications repeat until the text stops changing. Removals
    /// only ever shrink the text, so the loop terminates, and the returned
    /// value is a fixpoint of the whole transformation.
    pub fn clean(&self, text: &str) -> String {
        if self.is_identity() {
            return normalize_whitespace(text);
        }
        let mut current = text.to_string();
        loop {
            let next = normalize_whitespace(&self.apply_rules(&current));
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Single pass over all rule sets in the specified order.
    fn apply_rules(&self, text: &str) -> String {
        let mut out = text.to_string();

        // Longest passage first, so a short passage embedded in a longer one
        // cannot leave partial-removal artifacts.
        let mut passages: Vec<String> = self
            .texts_to_remove
            .iter()
            .map(|p| normalize_whitespace(p))
            .filter(|p| !p.is_empty())
            .collect();
        passages.sort_by_key(|p| Reverse(p.len()));
        for passage in &passages {
            out = out.replace(passage.as_str(), "");
        }

        for marker in &self.expressions {
            if !marker.is_empty() {
                out = out.replace(marker.as_str(), "");
            }
        }

        for special in &self.special_characters {
            if !special.is_empty() {
                out = out.replace(special.as_str(), "");
            }
        }

        out
    }
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(
        special: &[&str],
        expressions: &[&str],
        texts: &[&str],
    ) -> CleanupConfig {
        CleanupConfig {
            special_characters: special.iter().map(|s| s.to_string()).collect(),
            expressions: expressions.iter().map(|s| s.to_string()).collect(),
            texts_to_remove: texts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_identity_config_normalizes_whitespace_only() {
        let cfg = CleanupConfig::new();
        assert!(cfg.is_identity());
        assert_eq!(cfg.clean("  a\n\tb  "), "a b");
    }

    #[test]
    fn test_special_character_removal() {
        // Concrete scenario from the design contract.
        let cfg = config(&["\u{2022}"], &[], &[]);
        assert_eq!(cfg.clean("\u{2022} Item one\n\n"), "Item one");
    }

    #[test]
    fn test_boilerplate_removed_longest_first() {
        let cfg = config(&[], &[], &["Confidential", "Confidential draft"]);
        assert_eq!(
            cfg.clean("Confidential draft report"),
            "report",
            "the longer passage must win over its embedded prefix"
        );
    }

    #[test]
    fn test_expression_removal() {
        let cfg = config(&[], &["\u{c}"], &[]);
        assert_eq!(cfg.clean("before\u{c}after"), "beforeafter");
    }

    #[test]
    fn test_whitespace_class_marker_removed_before_collapse() {
        // A form-feed marker must be removed as itself, not first collapsed
        // into a space by whitespace normalization.
        let cfg = config(&[], &["\u{c}"], &[]);
        assert_eq!(cfg.clean("page one\u{c}page two"), "page onepage two");
        assert_eq!(cfg.clean("a \u{c} b"), "a b");
    }

    #[test]
    fn test_boilerplate_with_internal_whitespace() {
        // Passages are matched in whitespace-normalized space, so a line
        // break inside the document rendering still matches.
        let cfg = config(&[], &[], &["Do not distribute"]);
        assert_eq!(cfg.clean("intro Do not\ndistribute outro"), "intro outro");
    }

    #[test]
    fn test_clean_is_idempotent_on_reassembling_input() {
        // Removing "BA" from "BBAA" reassembles a fresh "BA"; the fixpoint
        // loop must consume it too.
        let cfg = config(&[], &[], &["BA"]);
        let once = cfg.clean("BBAA");
        assert_eq!(once, cfg.clean(&once));
        assert_eq!(once, "");
    }

    #[test]
    fn test_load_missing_file_degrades_to_identity() {
        let cfg = CleanupConfig::load("/nonexistent/cleanup.json");
        assert!(cfg.is_identity());
    }

    #[test]
    fn test_try_load_reports_reason() {
        let err = CleanupConfig::try_load(Path::new("/nonexistent/cleanup.json")).unwrap_err();
        assert!(format!("{}", err).contains("cleanup.json"));
    }
}
