//! Durable summary store boundary.
//!
//! The orchestrator writes progressively into the store as results
//! arrive, keyed by (file id, summary kind, section index). Semantics are
//! at-least-once: every put is a fresh overwrite for its key, and a
//! failed put is logged but never blocks sibling section tasks or the
//! in-memory aggregate.

pub mod json;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

pub use json::JsonStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// What stage of the pipeline produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    Short,
    Section,
    Global,
}

impl SummaryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Section => "section",
            Self::Global => "global",
        }
    }
}

/// Keyed durable store for summaries.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persist one summary. `section_index` is `Some` only for
    /// [`SummaryKind::Section`] entries; distinct (file, kind, index)
    /// keys tolerate concurrent writers.
    async fn put(
        &self,
        file_id: &str,
        kind: SummaryKind,
        section_index: Option<usize>,
        text: &str,
    ) -> Result<()>;

    /// Fetch one summary back, or `None` when absent.
    async fn get(
        &self,
        file_id: &str,
        kind: SummaryKind,
        section_index: Option<usize>,
    ) -> Result<Option<String>>;
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, SummaryKind, Option<usize>), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SummaryStore for MemoryStore {
    async fn put(
        &self,
        file_id: &str,
        kind: SummaryKind,
        section_index: Option<usize>,
        text: &str,
    ) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert((file_id.to_string(), kind, section_index), text.to_string());
        Ok(())
    }

    async fn get(
        &self,
        file_id: &str,
        kind: SummaryKind,
        section_index: Option<usize>,
    ) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(file_id.to_string(), kind, section_index))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.put("doc", SummaryKind::Short, None, "short summary").await.unwrap();

        let got = store.get("doc", SummaryKind::Short, None).await.unwrap();
        assert_eq!(got.as_deref(), Some("short summary"));
        assert!(store.get("doc", SummaryKind::Global, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn puts_are_idempotent_overwrites() {
        let store = MemoryStore::new();
        store.put("doc", SummaryKind::Section, Some(1), "v1").await.unwrap();
        store.put("doc", SummaryKind::Section, Some(1), "v2").await.unwrap();

        assert_eq!(store.len(), 1);
        let got = store.get("doc", SummaryKind::Section, Some(1)).await.unwrap();
        assert_eq!(got.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn section_indexes_are_distinct_keys() {
        let store = MemoryStore::new();
        store.put("doc", SummaryKind::Section, Some(1), "one").await.unwrap();
        store.put("doc", SummaryKind::Section, Some(2), "two").await.unwrap();

        assert_eq!(store.len(), 2);
    }
}
