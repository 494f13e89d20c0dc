//! JSON-file-backed summary store.
//!
//! One JSON document per file id. Every put rewrites the document through
//! a temp file + rename, so a crash mid-write leaves the previous
//! complete document on disk — at most the in-flight unit of work is
//! lost. Puts within one store are serialized by a mutex because all
//! section entries of a document share a single file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{Result, SummaryKind, SummaryStore};

/// One persisted summary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub kind: SummaryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_index: Option<usize>,
    pub text: String,
    pub saved_at: DateTime<Utc>,
}

/// The stored document for one file id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SummaryDocument {
    pub file: String,
    pub entries: Vec<SummaryRecord>,
}

/// File-system store rooted at a directory.
pub struct JsonStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open (and create if needed) a store at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, write_lock: Mutex::new(()) })
    }

    /// Default platform data location (`<data dir>/paperskim/summaries`).
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("paperskim")
            .join("summaries")
    }

    fn path_for(&self, file_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(file_id)))
    }

    async fn load(&self, file_id: &str) -> Result<Option<SummaryDocument>> {
        let path = self.path_for(file_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, file_id: &str, doc: &SummaryDocument) -> Result<()> {
        let path = self.path_for(file_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// The full stored document for a file id, if present.
    pub async fn document(&self, file_id: &str) -> Result<Option<SummaryDocument>> {
        self.load(file_id).await
    }

    /// All stored documents, in directory order.
    pub async fn list(&self) -> Result<Vec<SummaryDocument>> {
        let mut docs = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            docs.push(serde_json::from_slice(&bytes)?);
        }
        Ok(docs)
    }
}

#[async_trait::async_trait]
impl SummaryStore for JsonStore {
    async fn put(
        &self,
        file_id: &str,
        kind: SummaryKind,
        section_index: Option<usize>,
        text: &str,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut doc = self
            .load(file_id)
            .await?
            .unwrap_or_else(|| SummaryDocument { file: file_id.to_string(), entries: Vec::new() });

        let record = SummaryRecord {
            kind,
            section_index,
            text: text.to_string(),
            saved_at: Utc::now(),
        };

        match doc
            .entries
            .iter_mut()
            .find(|e| e.kind == kind && e.section_index == section_index)
        {
            Some(existing) => *existing = record,
            None => doc.entries.push(record),
        }

        self.save(file_id, &doc).await
    }

    async fn get(
        &self,
        file_id: &str,
        kind: SummaryKind,
        section_index: Option<usize>,
    ) -> Result<Option<String>> {
        Ok(self.load(file_id).await?.and_then(|doc| {
            doc.entries
                .into_iter()
                .find(|e| e.kind == kind && e.section_index == section_index)
                .map(|e| e.text)
        }))
    }
}

/// Keep file names shell- and filesystem-safe.
fn sanitize(file_id: &str) -> String {
    file_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}
