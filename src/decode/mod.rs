//! Document decoder boundary.
//!
//! Decoders turn an on-disk document into page geometry: blocks of lines
//! of positioned text runs, in a top-down coordinate system (y grows
//! toward the bottom of the page). Everything downstream — span
//! extraction, segmentation, table detection — consumes only these types
//! and never touches the underlying PDF library.

#[cfg(feature = "pdf")]
pub mod pdf;
pub mod table;

use std::path::Path;

use thiserror::Error;

/// Decoder errors. All of these are fatal: without page geometry no
/// sections can be produced.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Axis-aligned bounding box in document points, top-down y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f32,
    /// Top edge (smaller y is higher on the page).
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// A contiguous styled text fragment at a fixed position.
#[derive(Debug, Clone)]
pub struct DecodedRun {
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Style bits (bold, italic, ...) as reported by the decoder.
    pub style_flags: u32,
    pub bbox: BBox,
}

/// A line of runs in reading order (left to right).
#[derive(Debug, Clone)]
pub struct DecodedLine {
    pub runs: Vec<DecodedRun>,
}

/// A page block. Non-text blocks (images, vector art) carry no runs and
/// are skipped by span extraction.
#[derive(Debug, Clone)]
pub enum DecodedBlock {
    Text { lines: Vec<DecodedLine> },
    NonText,
}

/// One decoded page.
#[derive(Debug, Clone, Default)]
pub struct DecodedPage {
    pub blocks: Vec<DecodedBlock>,
}

/// Decoder output: ordered pages.
#[derive(Debug, Clone, Default)]
pub struct DecodedDocument {
    pub pages: Vec<DecodedPage>,
}

/// Turns a document file into page geometry.
pub trait DocumentDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedDocument, DecodeError>;
}
