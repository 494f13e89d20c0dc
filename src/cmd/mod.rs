//! CLI subcommand implementations.

pub mod sections;
pub mod store;
pub mod summarize;

use std::path::Path;

use anyhow::Result;
use paperskim::decode::DecodedDocument;

/// Decode a document file into page geometry.
///
/// PDF decoding requires the `pdf` feature (pdfium); without it the CLI
/// can still inspect stores but cannot ingest documents.
#[cfg(feature = "pdf")]
pub fn decode_document(path: &Path) -> Result<DecodedDocument> {
    use paperskim::decode::{pdf::PdfiumDecoder, DocumentDecoder};
    Ok(PdfiumDecoder::new().decode(path)?)
}

#[cfg(not(feature = "pdf"))]
pub fn decode_document(_path: &Path) -> Result<DecodedDocument> {
    anyhow::bail!(
        "this build has no document decoder; rebuild with `--features pdf` (requires pdfium)"
    )
}
