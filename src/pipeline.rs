//! Summarization orchestrator.
//!
//! Drives the multi-stage pipeline over the inferred sections:
//!
//! ```text
//! Init -> ShortSummaryPending -> SectionsFanOut -> GlobalPending -> Done
//! ```
//!
//! The short summary of the first section runs alone so the first result
//! is available fast. The remaining sections fan out as concurrent tasks,
//! each persisting its result the moment it completes — a crash loses at
//! most one in-flight unit of work. A strict join barrier precedes the
//! final global synthesis call, which sees every completed section
//! summary in original section order regardless of completion order.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::oracle::{Oracle, OracleError, TableText};
use crate::segment::{trim_references, Segmentation};
use crate::store::{SummaryKind, SummaryStore};

/// Characters of raw text used for the short summary when no sections exist.
const SHORT_FALLBACK_CHARS: usize = 2000;

/// Header label used when the document has no boundary for section 1.
const DEFAULT_FIRST_HEADER: &str = "Introduction";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("document has no extractable text")]
    NoText,

    /// Short-summary or global-synthesis call failed. Per-section calls
    /// never surface here; they become failure markers in the aggregate.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Orchestrator states, logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Init,
    ShortSummaryPending,
    SectionsFanOut,
    GlobalPending,
    Done,
}

/// Summary of one fanned-out section. Failed sections stay in the
/// aggregate with an explicit error instead of being silently omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub section_index: usize,
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SectionSummary {
    pub fn succeeded(&self) -> bool {
        self.summary.is_some()
    }
}

/// Aggregate result of one pipeline run. Immutable after the join point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub file_id: String,
    pub short_summary: String,
    /// In original section order, not completion order.
    pub section_summaries: Vec<SectionSummary>,
    pub global_summary: String,
    #[serde(rename = "tables")]
    pub table_refs: Vec<String>,
    pub headers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Independent timeout per oracle call. A timed-out call fails that
    /// call only, never the pipeline.
    pub oracle_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { oracle_timeout: Duration::from_secs(180) }
    }
}

/// The orchestrator. Cheap to construct per document run.
pub struct Pipeline {
    oracle: Arc<dyn Oracle>,
    store: Arc<dyn SummaryStore>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(oracle: Arc<dyn Oracle>, store: Arc<dyn SummaryStore>) -> Self {
        Self::with_config(oracle, store, PipelineConfig::default())
    }

    pub fn with_config(
        oracle: Arc<dyn Oracle>,
        store: Arc<dyn SummaryStore>,
        config: PipelineConfig,
    ) -> Self {
        Self { oracle, store, config }
    }

    /// Run the full pipeline over one segmented document.
    ///
    /// `document_text` is the whole-document raw text; references are
    /// trimmed from it before any oracle call. `tables` are appended to
    /// every section prompt.
    pub async fn run(
        &self,
        file_id: &str,
        segmentation: &Segmentation,
        document_text: &str,
        tables: Vec<TableText>,
    ) -> Result<PipelineResult, PipelineError> {
        let mut state = PipelineState::Init;
        let sections = &segmentation.sections;
        let document_text = trim_references(document_text);

        if sections.is_empty() && document_text.trim().is_empty() {
            return Err(PipelineError::NoText);
        }

        let tables = Arc::new(tables);

        // ── Short summary: one blocking call before anything fans out ──
        state = advance(state, PipelineState::ShortSummaryPending);

        let (first_header, first_text) = match sections.first() {
            Some(first) => (
                first.header.clone().unwrap_or_else(|| DEFAULT_FIRST_HEADER.to_string()),
                first.raw_text.clone(),
            ),
            None => (
                DEFAULT_FIRST_HEADER.to_string(),
                document_text.chars().take(SHORT_FALLBACK_CHARS).collect(),
            ),
        };

        let short_summary = call_oracle(
            &self.oracle,
            self.config.oracle_timeout,
            &first_header,
            &first_text,
            &tables,
        )
        .await?;
        persist(&self.store, file_id, SummaryKind::Short, None, &short_summary).await;

        // ── Fan out one task per remaining section ──
        state = advance(state, PipelineState::SectionsFanOut);

        let mut slots: Vec<Option<SectionOutcome>> = vec![None; sections.len()];
        let mut tasks: JoinSet<(usize, SectionOutcome)> = JoinSet::new();

        for section in sections.iter().skip(1) {
            let oracle = Arc::clone(&self.oracle);
            let store = Arc::clone(&self.store);
            let tables = Arc::clone(&tables);
            let timeout = self.config.oracle_timeout;
            let file_id = file_id.to_string();
            let index = section.index;
            let header = section
                .header
                .clone()
                .unwrap_or_else(|| format!("Section {}", index + 1));
            let text = section.raw_text.clone();

            tasks.spawn(async move {
                let outcome =
                    match call_oracle(&oracle, timeout, &header, &text, &tables).await {
                        Ok(summary) => {
                            persist(&store, &file_id, SummaryKind::Section, Some(index), &summary)
                                .await;
                            SectionOutcome::Summarized(summary)
                        }
                        Err(e) => {
                            warn!(section = index, error = %e, "section summarization failed");
                            SectionOutcome::Failed(e.to_string())
                        }
                    };
                (index, outcome)
            });
        }

        // Join barrier: every task lands in its own slot, siblings drain
        // even when one of them failed.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!(error = %e, "section task aborted"),
            }
        }

        let section_summaries: Vec<SectionSummary> = sections
            .iter()
            .skip(1)
            .map(|section| {
                let header = section
                    .header
                    .clone()
                    .unwrap_or_else(|| format!("Section {}", section.index + 1));
                match slots[section.index].take() {
                    Some(SectionOutcome::Summarized(summary)) => SectionSummary {
                        section_index: section.index,
                        header,
                        summary: Some(summary),
                        error: None,
                    },
                    Some(SectionOutcome::Failed(error)) => SectionSummary {
                        section_index: section.index,
                        header,
                        summary: None,
                        error: Some(error),
                    },
                    None => SectionSummary {
                        section_index: section.index,
                        header,
                        summary: None,
                        error: Some("task aborted before completion".to_string()),
                    },
                }
            })
            .collect();

        // ── Global synthesis over everything that completed ──
        state = advance(state, PipelineState::GlobalPending);

        let synthesis = synthesis_text(&short_summary, &section_summaries);
        let global_summary = call_oracle(
            &self.oracle,
            self.config.oracle_timeout,
            "Global Summary",
            &synthesis,
            &[],
        )
        .await?;
        persist(&self.store, file_id, SummaryKind::Global, None, &global_summary).await;

        state = advance(state, PipelineState::Done);
        debug!(?state, sections = section_summaries.len(), "pipeline complete");

        Ok(PipelineResult {
            file_id: file_id.to_string(),
            short_summary,
            section_summaries,
            global_summary,
            table_refs: tables.iter().map(|t| t.label.clone()).collect(),
            headers: segmentation.headers(),
        })
    }
}

#[derive(Debug, Clone)]
enum SectionOutcome {
    Summarized(String),
    Failed(String),
}

fn advance(from: PipelineState, to: PipelineState) -> PipelineState {
    debug!(?from, ?to, "pipeline state transition");
    to
}

/// One oracle call under its own timeout.
async fn call_oracle(
    oracle: &Arc<dyn Oracle>,
    timeout: Duration,
    section_name: &str,
    text: &str,
    tables: &[TableText],
) -> crate::oracle::Result<String> {
    match tokio::time::timeout(timeout, oracle.summarize(section_name, text, tables)).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout),
    }
}

/// Persist one summary; store failures are logged and never block progress.
async fn persist(
    store: &Arc<dyn SummaryStore>,
    file_id: &str,
    kind: SummaryKind,
    section_index: Option<usize>,
    text: &str,
) {
    if let Err(e) = store.put(file_id, kind, section_index, text).await {
        warn!(file_id, kind = kind.as_str(), error = %e, "failed to persist summary");
    }
}

/// Build the synthesis body from the short summary and every completed
/// section summary, in section order. Failed sections are skipped.
fn synthesis_text(short_summary: &str, section_summaries: &[SectionSummary]) -> String {
    let mut text = format!(
        "Summarize this paper in 3 sentences:\nShort Summary: {short_summary}\n"
    );
    for s in section_summaries {
        if let Some(summary) = &s.summary {
            text.push_str(&format!(
                "Section {} ({}): {}\n",
                s.section_index + 1,
                s.header,
                summary
            ));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::segment::Section;
    use crate::store::MemoryStore;

    /// Scripted oracle: records call order, optionally delays or fails
    /// specific section names.
    #[derive(Default)]
    struct MockOracle {
        calls: AtomicUsize,
        call_log: Mutex<Vec<(String, String)>>,
        delays_ms: HashMap<String, u64>,
        fail: HashSet<String>,
    }

    #[async_trait::async_trait]
    impl Oracle for MockOracle {
        async fn summarize(
            &self,
            section_name: &str,
            text: &str,
            _tables: &[TableText],
        ) -> crate::oracle::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(section_name) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.call_log
                .lock()
                .unwrap()
                .push((section_name.to_string(), text.to_string()));
            if self.fail.contains(section_name) {
                return Err(OracleError::Api { status: 429, message: "quota".into() });
            }
            Ok(format!("summary of {section_name}"))
        }
    }

    fn section(index: usize, header: &str, text: &str) -> Section {
        Section { index, header: Some(header.to_string()), raw_text: text.to_string() }
    }

    fn segmentation(sections: Vec<Section>) -> Segmentation {
        Segmentation { sections, boundaries: Vec::new() }
    }

    fn pipeline(oracle: Arc<MockOracle>, store: Arc<MemoryStore>) -> Pipeline {
        Pipeline::new(oracle, store)
    }

    #[tokio::test]
    async fn issues_one_call_per_section_plus_global() {
        let oracle = Arc::new(MockOracle::default());
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![
            section(0, "Intro", "intro text"),
            section(1, "Methods", "methods text"),
            section(2, "Results", "results text"),
            section(3, "Discussion", "discussion text"),
        ]);

        let result = pipeline(Arc::clone(&oracle), store)
            .run("doc", &seg, "full text", vec![])
            .await
            .unwrap();

        // 1 short + 3 fan-out + 1 global
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 5);
        assert_eq!(result.section_summaries.len(), 3);
        assert_eq!(result.short_summary, "summary of Intro");
        assert_eq!(result.global_summary, "summary of Global Summary");
    }

    #[tokio::test]
    async fn global_call_is_last() {
        let mut oracle = MockOracle::default();
        oracle.delays_ms.insert("Methods".into(), 40);
        let oracle = Arc::new(oracle);
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![
            section(0, "Intro", "a"),
            section(1, "Methods", "b"),
            section(2, "Results", "c"),
        ]);

        pipeline(Arc::clone(&oracle), store).run("doc", &seg, "text", vec![]).await.unwrap();

        let log = oracle.call_log.lock().unwrap();
        assert_eq!(log.last().unwrap().0, "Global Summary");
        assert_eq!(log.first().unwrap().0, "Intro");
    }

    #[tokio::test]
    async fn aggregate_order_matches_section_order_not_completion_order() {
        // Make earlier sections finish later
        let mut oracle = MockOracle::default();
        oracle.delays_ms.insert("S1".into(), 60);
        oracle.delays_ms.insert("S2".into(), 30);
        oracle.delays_ms.insert("S3".into(), 5);
        let oracle = Arc::new(oracle);
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![
            section(0, "S0", "t0"),
            section(1, "S1", "t1"),
            section(2, "S2", "t2"),
            section(3, "S3", "t3"),
        ]);

        let result = pipeline(oracle, store).run("doc", &seg, "text", vec![]).await.unwrap();

        let order: Vec<usize> =
            result.section_summaries.iter().map(|s| s.section_index).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_section_is_marked_and_siblings_drain() {
        let mut oracle = MockOracle::default();
        oracle.fail.insert("Methods".into());
        let oracle = Arc::new(oracle);
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![
            section(0, "Intro", "a"),
            section(1, "Methods", "b"),
            section(2, "Results", "c"),
        ]);

        let result = pipeline(oracle, Arc::clone(&store))
            .run("doc", &seg, "text", vec![])
            .await
            .unwrap();

        let methods = &result.section_summaries[0];
        assert!(!methods.succeeded());
        assert!(methods.error.as_deref().unwrap().contains("429"));

        let results = &result.section_summaries[1];
        assert!(results.succeeded());

        // The failed section was never persisted; the sibling was.
        assert!(store.get("doc", SummaryKind::Section, Some(1)).await.unwrap().is_none());
        assert!(store.get("doc", SummaryKind::Section, Some(2)).await.unwrap().is_some());
        // Global synthesis still ran.
        assert!(!result.global_summary.is_empty());
    }

    #[tokio::test]
    async fn timed_out_section_becomes_a_failure_marker() {
        let mut oracle = MockOracle::default();
        oracle.delays_ms.insert("Slow".into(), 200);
        let oracle = Arc::new(oracle);
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![section(0, "Intro", "a"), section(1, "Slow", "b")]);

        let config = PipelineConfig { oracle_timeout: Duration::from_millis(50) };
        let result = Pipeline::with_config(oracle, store, config)
            .run("doc", &seg, "text", vec![])
            .await
            .unwrap();

        let slow = &result.section_summaries[0];
        assert!(slow.error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn no_sections_falls_back_to_truncated_raw_text() {
        let oracle = Arc::new(MockOracle::default());
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![]);
        let long_text: String = "x".repeat(5000);

        let result = pipeline(Arc::clone(&oracle), store)
            .run("doc", &seg, &long_text, vec![])
            .await
            .unwrap();

        assert!(result.section_summaries.is_empty());
        let log = oracle.call_log.lock().unwrap();
        let (name, text) = &log[0];
        assert_eq!(name, "Introduction");
        assert_eq!(text.chars().count(), 2000);
        assert_eq!(result.short_summary, "summary of Introduction");
    }

    #[tokio::test]
    async fn references_are_trimmed_from_fallback_text() {
        let oracle = Arc::new(MockOracle::default());
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![]);
        let text = "Short body.\nReferences\n[1] a very long citation list";

        pipeline(Arc::clone(&oracle), store).run("doc", &seg, text, vec![]).await.unwrap();

        let log = oracle.call_log.lock().unwrap();
        assert_eq!(log[0].1, "Short body.");
    }

    #[tokio::test]
    async fn empty_document_is_an_error() {
        let oracle = Arc::new(MockOracle::default());
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![]);

        let err = pipeline(oracle, store).run("doc", &seg, "   \n ", vec![]).await;
        assert!(matches!(err, Err(PipelineError::NoText)));
    }

    #[tokio::test]
    async fn persists_short_sections_and_global_progressively() {
        let oracle = Arc::new(MockOracle::default());
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![
            section(0, "Intro", "a"),
            section(1, "Methods", "b"),
        ]);

        pipeline(oracle, Arc::clone(&store)).run("doc", &seg, "text", vec![]).await.unwrap();

        assert!(store.get("doc", SummaryKind::Short, None).await.unwrap().is_some());
        assert!(store.get("doc", SummaryKind::Section, Some(1)).await.unwrap().is_some());
        assert!(store.get("doc", SummaryKind::Global, None).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn result_reports_table_labels() {
        let oracle = Arc::new(MockOracle::default());
        let store = Arc::new(MemoryStore::new());
        let seg = segmentation(vec![section(0, "Intro", "a")]);
        let tables = vec![
            TableText { label: "table_1".into(), text: "| a |".into() },
            TableText { label: "table_2".into(), text: "| b |".into() },
        ];

        let result =
            pipeline(oracle, store).run("doc", &seg, "text", tables).await.unwrap();
        assert_eq!(result.table_refs, vec!["table_1", "table_2"]);
    }

    #[test]
    fn synthesis_skips_failed_sections() {
        let summaries = vec![
            SectionSummary {
                section_index: 1,
                header: "Methods".into(),
                summary: Some("methods summary".into()),
                error: None,
            },
            SectionSummary {
                section_index: 2,
                header: "Results".into(),
                summary: None,
                error: Some("quota".into()),
            },
        ];
        let text = synthesis_text("the short one", &summaries);
        assert!(text.contains("Short Summary: the short one"));
        assert!(text.contains("Section 2 (Methods): methods summary"));
        assert!(!text.contains("Results"));
    }
}
