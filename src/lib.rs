//! `paperskim` - Layout-aware PDF section summarizer
//!
//! # Features
//!
//! - **Typographic segmentation**: infers section structure from font size
//!   statistics, vertical position, and cross-page repetition — no heading
//!   markup required
//! - **Concurrent summarization**: one fast short summary, then one task
//!   per section fanned out over the oracle, then a global synthesis
//! - **Progressive persistence**: every summary is stored the moment it
//!   completes, so a crash loses at most one in-flight call
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paperskim::oracle::ClaudeOracle;
//! use paperskim::pipeline::Pipeline;
//! use paperskim::store::MemoryStore;
//! use paperskim::{extract, segment};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pages = vec![]; // from a DocumentDecoder
//!     let extracted = extract::extract_runs(&pages);
//!     let segmentation = segment::segment(&extracted);
//!     let text = extract::document_text(&extracted.page_texts);
//!
//!     let pipeline = Pipeline::new(
//!         Arc::new(ClaudeOracle::from_env()?),
//!         Arc::new(MemoryStore::new()),
//!     );
//!     let result = pipeline.run("paper.pdf", &segmentation, &text, vec![]).await?;
//!     println!("{}", result.global_summary);
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod extract;
pub mod oracle;
pub mod pipeline;
pub mod segment;
pub mod store;

pub use decode::{DecodeError, DecodedDocument, DocumentDecoder};
pub use extract::{extract_runs, ExtractedRuns, TextRun};
pub use oracle::{Oracle, OracleError, TableText};
pub use pipeline::{Pipeline, PipelineError, PipelineResult, SectionSummary};
pub use segment::{segment, Section, Segmentation};
pub use store::{SummaryKind, SummaryStore};

/// Version of paperskim
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
