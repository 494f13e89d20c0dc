//! Layout-driven section segmentation.
//!
//! Infers a document's section structure purely from typographic signals:
//! the font size distribution designates a body size, larger sizes become
//! heading candidates, repetition across pages weeds out running
//! headers/footers, and the surviving boundaries slice the run sequence
//! into ordered sections. No heading markup and no language understanding
//! is involved — the decisions rest on geometry and statistics alone.
//!
//! A document where no structure can be detected degrades to a single
//! section holding the whole document text; that is a normal outcome, not
//! an error.

pub mod boundaries;
pub mod candidates;
pub mod refs;
pub mod sizes;

pub use boundaries::{assemble_sections, order_boundaries, Section};
pub use candidates::{drop_repeating, header_candidates, HeaderCandidate};
pub use refs::trim_references;
pub use sizes::{SizeClasses, SizeHistogram};

use tracing::debug;

use crate::extract::ExtractedRuns;

/// Result of one segmentation pass.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Ordered sections. At least one when the document has any text.
    pub sections: Vec<Section>,
    /// Confirmed boundaries in reading order; empty when the document
    /// collapsed to a single whole-document section.
    pub boundaries: Vec<HeaderCandidate>,
}

impl Segmentation {
    /// Heading texts in section reading order.
    pub fn headers(&self) -> Vec<String> {
        self.boundaries.iter().map(|b| b.text.clone()).collect()
    }
}

/// Segment an extracted run sequence into sections.
///
/// Falls back to one whole-document section when the size classifier
/// detects no structure or no heading survives filtering.
pub fn segment(extracted: &ExtractedRuns) -> Segmentation {
    let page_count = extracted.page_count();

    let boundaries = match SizeClasses::classify(&extracted.runs) {
        Some(classes) => {
            let candidates = header_candidates(&extracted.runs, &classes);
            debug!(
                body_size = f64::from(classes.body_size()),
                candidates = candidates.len(),
                "classified run sizes"
            );
            order_boundaries(drop_repeating(candidates, page_count))
        }
        None => {
            debug!("no structure detected, collapsing to a single section");
            Vec::new()
        }
    };

    let sections = assemble_sections(&extracted.runs, &boundaries);
    if sections.is_empty() {
        return Segmentation {
            sections: whole_document_section(extracted),
            boundaries: Vec::new(),
        };
    }

    debug!(sections = sections.len(), "segmentation complete");
    Segmentation { sections, boundaries }
}

fn whole_document_section(extracted: &ExtractedRuns) -> Vec<Section> {
    let text = extracted.page_texts.concat();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    vec![Section { index: 0, header: None, raw_text: trimmed.to_string() }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TextRun;

    fn run(text: &str, size: f32, y: f32, page: usize) -> TextRun {
        TextRun { text: text.to_string(), size, style_flags: 0, y, page }
    }

    fn extracted(runs: Vec<TextRun>, page_count: usize) -> ExtractedRuns {
        let mut page_texts = vec![String::new(); page_count];
        for r in &runs {
            page_texts[r.page].push_str(&r.text);
        }
        ExtractedRuns { runs, page_texts }
    }

    #[test]
    fn detects_two_sections_from_typography() {
        // Body size 10, two 16pt headings, no repetition
        let input = extracted(
            vec![
                run("Paper Title ", 16.0, 10.0, 0), // above top margin cutoff
                run("Introduction ", 16.0, 50.0, 0),
                run("intro body text ", 10.0, 80.0, 0),
                run("more intro ", 10.0, 20.0, 1),
                run("Methods ", 16.0, 30.0, 1),
                run("methods body text ", 10.0, 60.0, 1),
                run("trailing text", 10.0, 40.0, 2),
            ],
            3,
        );
        let seg = segment(&input);

        assert_eq!(seg.headers(), vec!["Introduction", "Methods"]);
        assert_eq!(seg.sections.len(), 2);
        assert!(seg.sections[0].raw_text.contains("intro body text"));
        assert!(seg.sections[1].raw_text.contains("trailing text"));
    }

    #[test]
    fn running_header_contributes_no_boundary() {
        // "Draft v2" (16pt) repeats on all 3 pages at y=25; the sole real
        // heading is "Results" on page 1.
        let mut runs = vec![
            run("Results ", 16.0, 50.0, 1),
            run("results body ", 10.0, 80.0, 1),
            run("extra body line ", 10.0, 120.0, 0),
        ];
        for page in 0..3 {
            runs.push(run("Draft v2 ", 16.0, 25.0, page));
            runs.push(run("filler body text ", 10.0, 100.0, page));
        }
        let seg = segment(&extracted(runs, 3));

        assert_eq!(seg.headers(), vec!["Results"]);
    }

    #[test]
    fn collapses_to_single_section_without_structure() {
        // All runs ≤ 2 chars: no histogram, whole document becomes one section
        let input = extracted(
            vec![run("a ", 10.0, 50.0, 0), run("b ", 12.0, 60.0, 0), run("c", 14.0, 40.0, 1)],
            2,
        );
        let seg = segment(&input);

        assert_eq!(seg.sections.len(), 1);
        assert!(seg.boundaries.is_empty());
        assert_eq!(seg.sections[0].header, None);
        assert_eq!(seg.sections[0].raw_text, "a b c");
    }

    #[test]
    fn collapses_when_no_candidate_survives() {
        // Uniform size: heading set is empty, so no boundaries exist
        let input = extracted(
            vec![run("plain paragraph ", 10.0, 50.0, 0), run("more text", 10.0, 70.0, 0)],
            1,
        );
        let seg = segment(&input);

        assert_eq!(seg.sections.len(), 1);
        assert_eq!(seg.sections[0].raw_text, "plain paragraph more text");
    }

    #[test]
    fn empty_document_yields_no_sections() {
        let seg = segment(&ExtractedRuns::default());
        assert!(seg.sections.is_empty());
        assert!(seg.boundaries.is_empty());
    }
}
