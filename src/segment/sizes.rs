//! Font size classification.
//!
//! Builds the size frequency distribution of a document's runs and infers
//! which size is ordinary body text. Runs of trimmed length ≤ 2 are
//! excluded: punctuation and page numbers bias the distribution toward
//! noise. Any size strictly larger than the body size is a candidate
//! heading size.

use std::collections::{BTreeMap, BTreeSet};

use crate::extract::TextRun;

/// Sizes are bucketed to 0.1pt so that float jitter from the decoder does
/// not split one logical size into several histogram bins.
pub(crate) fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Frequency distribution of run sizes, keyed by bucketed size.
#[derive(Debug, Clone, Default)]
pub struct SizeHistogram {
    counts: BTreeMap<i32, usize>,
}

impl SizeHistogram {
    /// Count sizes over runs whose trimmed text length exceeds 2 characters.
    pub fn build(runs: &[TextRun]) -> Self {
        let mut counts = BTreeMap::new();
        for run in runs {
            if run.text.trim().chars().count() > 2 {
                *counts.entry(size_key(run.size)).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The mode of the distribution. Ties resolve to the smallest size so
    /// the result is deterministic regardless of input order.
    fn mode(&self) -> Option<i32> {
        self.counts
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, _)| *k)
    }
}

/// The inferred body size and the set of heading sizes.
#[derive(Debug, Clone)]
pub struct SizeClasses {
    /// Bucketed body size (the histogram's mode).
    body_key: i32,
    /// Every observed size strictly greater than the body size.
    heading_keys: BTreeSet<i32>,
}

impl SizeClasses {
    /// `None` means "no structure detected": the document has no runs of
    /// length > 2 and the caller must fall back to a single section.
    pub fn classify(runs: &[TextRun]) -> Option<Self> {
        let histogram = SizeHistogram::build(runs);
        let body_key = histogram.mode()?;
        let heading_keys = histogram
            .counts
            .keys()
            .filter(|&&k| k > body_key)
            .copied()
            .collect();
        Some(Self { body_key, heading_keys })
    }

    /// Is this size one of the observed heading sizes?
    ///
    /// Membership is against the histogram, not a plain `> body` check: a
    /// size seen only on short runs never entered the distribution and is
    /// not a heading size.
    pub fn is_heading_size(&self, size: f32) -> bool {
        self.heading_keys.contains(&size_key(size))
    }

    pub fn body_size(&self) -> f32 {
        self.body_key as f32 / 10.0
    }

    pub fn has_heading_sizes(&self) -> bool {
        !self.heading_keys.is_empty()
    }
}
