//! Span extraction: decoded page geometry → flat run sequence.
//!
//! Walks block → line → run geometry in page order, skipping non-text
//! blocks, and flattens everything into the ordered [`TextRun`] sequence
//! that segmentation consumes. Also keeps the concatenated raw text of
//! each page, which is the fallback content when no headings are found.

use crate::decode::{DecodedBlock, DecodedPage};

/// A contiguous styled text fragment at a fixed position, the
/// finest-grained unit of extracted layout.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Style bits as reported by the decoder.
    pub style_flags: u32,
    /// Top edge in top-down coordinates (small y = near the top edge).
    pub y: f32,
    /// Page index (0-based).
    pub page: usize,
}

/// Output of span extraction: the flat run sequence plus per-page raw text.
#[derive(Debug, Clone, Default)]
pub struct ExtractedRuns {
    pub runs: Vec<TextRun>,
    pub page_texts: Vec<String>,
}

impl ExtractedRuns {
    pub fn page_count(&self) -> usize {
        self.page_texts.len()
    }
}

/// Flatten decoded pages into an ordered run sequence.
///
/// Non-text blocks contribute no runs. Pure transform: the output order is
/// the decoder's block/line/run order, page by page.
pub fn extract_runs(pages: &[DecodedPage]) -> ExtractedRuns {
    let mut runs = Vec::new();
    let mut page_texts = Vec::with_capacity(pages.len());

    for (page_idx, page) in pages.iter().enumerate() {
        let mut page_text = String::new();

        for block in &page.blocks {
            let lines = match block {
                DecodedBlock::Text { lines } => lines,
                DecodedBlock::NonText => continue,
            };

            for line in lines {
                for run in &line.runs {
                    runs.push(TextRun {
                        text: run.text.clone(),
                        size: run.size,
                        style_flags: run.style_flags,
                        y: run.bbox.y0,
                        page: page_idx,
                    });
                    page_text.push_str(&run.text);
                }
            }
        }

        page_texts.push(page_text);
    }

    ExtractedRuns { runs, page_texts }
}

/// Assemble the whole-document text with page markers between pages.
///
/// Used as the short-summary fallback when segmentation found no sections.
pub fn document_text(page_texts: &[String]) -> String {
    let total = page_texts.len();
    let mut text = String::new();
    for (i, page) in page_texts.iter().enumerate() {
        text.push_str(page);
        text.push_str(&format!("\n\nPage {} of {}\n\n", i + 1, total));
    }
    text
}
