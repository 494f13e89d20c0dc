//! Header candidate selection.
//!
//! A run is a heading candidate when its size is one of the document's
//! heading sizes, it sits below the top-margin cutoff, and its trimmed
//! text is longer than 2 characters. Candidates are then screened for
//! repetition: a candidate text recurring on more than half the pages is
//! a running header or footer, and every occurrence of it is dropped.

use std::collections::HashMap;

use crate::extract::TextRun;

use super::sizes::SizeClasses;

/// Runs with `y` at or above this cutoff (near the very top edge) are
/// page furniture, not headings.
const TOP_MARGIN: f32 = 20.0;

/// A run promoted to a potential section heading.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCandidate {
    pub page: usize,
    /// Trimmed heading text.
    pub text: String,
    pub y: f32,
    pub size: f32,
}

/// Select heading candidates from the run sequence.
pub fn header_candidates(runs: &[TextRun], classes: &SizeClasses) -> Vec<HeaderCandidate> {
    runs.iter()
        .filter(|run| {
            classes.is_heading_size(run.size)
                && run.y > TOP_MARGIN
                && run.text.trim().chars().count() > 2
        })
        .map(|run| HeaderCandidate {
            page: run.page,
            text: run.text.trim().to_string(),
            y: run.y,
            size: run.size,
        })
        .collect()
}

/// Drop candidates whose exact text repeats on more than half the pages.
///
/// This is a single global pass over the full candidate set: the decision
/// is per text string, not per occurrence, so a repeating header is
/// excluded from every page rather than just the excess ones. The result
/// is deterministic regardless of candidate order.
pub fn drop_repeating(candidates: Vec<HeaderCandidate>, page_count: usize) -> Vec<HeaderCandidate> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for candidate in &candidates {
        *occurrences.entry(candidate.text.as_str()).or_insert(0) += 1;
    }

    let threshold = page_count / 2;
    let repeated: Vec<String> = occurrences
        .iter()
        .filter(|(_, &count)| count > threshold)
        .map(|(text, _)| (*text).to_string())
        .collect();

    candidates
        .into_iter()
        .filter(|c| !repeated.iter().any(|r| r == &c.text))
        .collect()
}
