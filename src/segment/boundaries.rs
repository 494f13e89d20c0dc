//! Boundary assembly: confirmed headings → ordered sections.
//!
//! Boundaries are the surviving header candidates, totally ordered by
//! (page, y). Consecutive boundaries slice the run sequence into
//! contiguous sections; the run at a boundary position (the heading
//! itself) belongs to the section it opens. Runs before the very first
//! boundary are front matter and are not emitted as a section.

use crate::extract::TextRun;

use super::candidates::HeaderCandidate;

/// One inferred document section.
#[derive(Debug, Clone)]
pub struct Section {
    /// Position in the emitted section order.
    pub index: usize,
    /// Heading text of the opening boundary; `None` only for the
    /// whole-document fallback section.
    pub header: Option<String>,
    /// Trimmed concatenation of every run between this section's boundary
    /// (inclusive) and the next one (exclusive).
    pub raw_text: String,
}

/// Sort candidates into reading order and dedup identical positions.
pub fn order_boundaries(mut candidates: Vec<HeaderCandidate>) -> Vec<HeaderCandidate> {
    candidates.sort_by(|a, b| a.page.cmp(&b.page).then(a.y.total_cmp(&b.y)));
    candidates.dedup_by(|a, b| a.page == b.page && a.y == b.y);
    candidates
}

/// Slice the run sequence into sections between consecutive boundaries.
///
/// For a boundary pair `(p0, y0) -> (p1, y1)` the section covers pages
/// `p0..=p1`: on `p0` runs with `y < y0` are excluded, on `p1` runs with
/// `y >= y1` are excluded, middle pages contribute fully. The final
/// boundary opens a trailing section that extends to end of document.
///
/// A section whose text is empty after trimming is dropped, but its
/// boundary still bounds the previous section and the next section still
/// starts at its own boundary, so the partition of the run sequence is
/// preserved.
pub fn assemble_sections(runs: &[TextRun], boundaries: &[HeaderCandidate]) -> Vec<Section> {
    if boundaries.is_empty() {
        return Vec::new();
    }

    let last_page = runs
        .iter()
        .map(|r| r.page)
        .chain(boundaries.iter().map(|b| b.page))
        .max()
        .unwrap_or(0);

    // Per-page run slices to keep the boundary loop O(pages + runs)
    let mut by_page: Vec<Vec<&TextRun>> = vec![Vec::new(); last_page + 1];
    for run in runs {
        by_page[run.page].push(run);
    }

    let mut sections = Vec::new();

    for (i, start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1);
        let end_page = end.map_or(last_page, |b| b.page);

        let mut text = String::new();
        for page in start.page..=end_page {
            for run in &by_page[page] {
                if page == start.page && run.y < start.y {
                    continue;
                }
                if let Some(end) = end {
                    if page == end.page && run.y >= end.y {
                        continue;
                    }
                }
                text.push_str(&run.text);
            }
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            sections.push(Section {
                index: sections.len(),
                header: Some(start.text.clone()),
                raw_text: trimmed.to_string(),
            });
        }
    }

    sections
}
