//! Reference section trimming.
//!
//! Cuts the whole-document text at the first standalone
//! "References"/"Bibliography" line so the summarization oracle never
//! sees pages of citations. Applied only to raw document text handed to
//! the oracle; boundary detection always runs over the full run sequence.

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCES_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\n\s*(references|bibliography)\s*\n").expect("valid regex"));

/// Truncate everything from the first references/bibliography line onward.
/// Returns the input unchanged when no such line exists.
pub fn trim_references(text: &str) -> &str {
    match REFERENCES_LINE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_at_references_line() {
        let text = "Body of the paper.\nReferences\n[1] Some citation";
        assert_eq!(trim_references(text), "Body of the paper.");
    }

    #[test]
    fn matches_case_insensitively() {
        let text = "Body.\n  BIBLIOGRAPHY  \n[1] cite";
        assert_eq!(trim_references(text), "Body.");
    }

    #[test]
    fn ignores_inline_mentions() {
        let text = "See the references section for details.\nMore body text.\n";
        assert_eq!(trim_references(text), text);
    }

    #[test]
    fn unchanged_without_match() {
        let text = "Just a document.\nWith two lines.\n";
        assert_eq!(trim_references(text), text);
    }

    #[test]
    fn only_the_first_match_counts() {
        let text = "Intro.\nReferences\nearly list\nReferences\nlate list";
        assert_eq!(trim_references(text), "Intro.");
    }
}
