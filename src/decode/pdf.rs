//! Pdfium-backed document decoder.
//!
//! Uses `pdfium-render` (Chromium's PDF library) to extract character
//! positions, then reconstructs lines and runs from the raw character
//! stream. Pdfium reports bottom-up coordinates; this module converts to
//! the top-down system the rest of the crate expects, so a run near the
//! top edge of a page has a small `y0`.

use std::path::Path;

use pdfium_render::prelude::*;

use super::{BBox, DecodeError, DecodedBlock, DecodedDocument, DecodedLine, DecodedPage, DecodedRun};

/// A positioned character, top-down y.
#[derive(Debug, Clone)]
struct PdfChar {
    ch: char,
    /// Left edge in PDF points (1pt = 1/72 inch).
    x: f32,
    /// Top edge, top-down.
    y: f32,
    width: f32,
    /// Font size approximation (character height).
    height: f32,
}

/// Decodes PDF files into page geometry via pdfium.
pub struct PdfiumDecoder;

impl PdfiumDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Extract all characters with their bounding rectangles, per page.
    #[allow(deprecated)] // PdfRect field access deprecated in 0.8.28, removed in 0.9.0
    fn extract_chars(path: &Path) -> Result<Vec<Vec<PdfChar>>, DecodeError> {
        let pdfium = Pdfium::default();
        let doc = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| DecodeError::Pdf(format!("failed to parse PDF: {e}")))?;

        let mut pages = Vec::with_capacity(doc.pages().len() as usize);

        for page in doc.pages().iter() {
            let page_height = page.height().value;
            let text = page
                .text()
                .map_err(|e| DecodeError::Pdf(format!("failed to extract text: {e}")))?;

            let mut chars = Vec::new();
            for ch in text.chars().iter() {
                if let (Some(unicode_ch), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) {
                    chars.push(PdfChar {
                        ch: unicode_ch,
                        x: rect.left.value,
                        y: page_height - rect.top.value,
                        width: (rect.right.value - rect.left.value).abs(),
                        height: (rect.top.value - rect.bottom.value).abs(),
                    });
                }
            }
            pages.push(chars);
        }

        Ok(pages)
    }

    /// Reconstruct lines from one page's positioned characters.
    ///
    /// 1. Sort by Y ascending (top-to-bottom in top-down coords), then X ascending.
    /// 2. Group characters with Y within `line_tolerance` into the same line.
    /// 3. Split a line into runs at horizontal gaps wider than twice the
    ///    average character width; insert spaces at smaller word gaps.
    fn reconstruct_lines(chars: &[PdfChar]) -> Vec<DecodedLine> {
        if chars.is_empty() {
            return Vec::new();
        }

        let mut sorted = chars.to_vec();
        sorted.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<DecodedLine> = Vec::new();
        let mut current: Vec<PdfChar> = vec![sorted[0].clone()];
        let line_tolerance = sorted[0].height * 0.4;

        for ch in sorted.iter().skip(1) {
            let last = current.last().unwrap();
            if (ch.y - last.y).abs() < line_tolerance {
                current.push(ch.clone());
            } else {
                lines.push(Self::build_line(&current));
                current = vec![ch.clone()];
            }
        }
        if !current.is_empty() {
            lines.push(Self::build_line(&current));
        }

        lines
    }

    /// Build a [`DecodedLine`] from grouped characters.
    fn build_line(chars: &[PdfChar]) -> DecodedLine {
        let avg_width = chars.iter().map(|c| c.width).sum::<f32>() / chars.len() as f32;
        let space_threshold = avg_width * 0.3;
        let column_threshold = avg_width * 2.0;

        let mut runs = Vec::new();
        let mut start = 0;

        for i in 1..chars.len() {
            let gap = chars[i].x - (chars[i - 1].x + chars[i - 1].width);
            if gap > column_threshold {
                runs.push(Self::build_run(&chars[start..i], space_threshold));
                start = i;
            }
        }
        runs.push(Self::build_run(&chars[start..], space_threshold));

        DecodedLine { runs }
    }

    /// Build a single run from consecutive characters, inserting spaces at
    /// word gaps.
    fn build_run(chars: &[PdfChar], space_threshold: f32) -> DecodedRun {
        let mut text = String::new();
        for (i, ch) in chars.iter().enumerate() {
            if i > 0 {
                let gap = ch.x - (chars[i - 1].x + chars[i - 1].width);
                if gap > space_threshold {
                    text.push(' ');
                }
            }
            text.push(ch.ch);
        }

        let last = chars.last().unwrap();
        let size = chars.iter().map(|c| c.height).sum::<f32>() / chars.len() as f32;
        let y0 = chars.iter().map(|c| c.y).fold(f32::INFINITY, f32::min);
        let y1 = chars
            .iter()
            .map(|c| c.y + c.height)
            .fold(f32::NEG_INFINITY, f32::max);

        DecodedRun {
            text,
            size,
            // Pdfium's char API does not expose style bits.
            style_flags: 0,
            bbox: BBox {
                x0: chars[0].x,
                y0,
                x1: last.x + last.width,
                y1,
            },
        }
    }
}

impl Default for PdfiumDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl super::DocumentDecoder for PdfiumDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedDocument, DecodeError> {
        let char_pages = Self::extract_chars(path)?;

        let pages = char_pages
            .iter()
            .map(|chars| {
                let lines = Self::reconstruct_lines(chars);
                let blocks = if lines.is_empty() {
                    // Scanned page: image content only, no text layer.
                    vec![DecodedBlock::NonText]
                } else {
                    vec![DecodedBlock::Text { lines }]
                };
                DecodedPage { blocks }
            })
            .collect();

        Ok(DecodedDocument { pages })
    }
}
