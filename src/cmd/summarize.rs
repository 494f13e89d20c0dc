use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use paperskim::decode::table::detect_tables;
use paperskim::oracle::{ClaudeOracle, TableText};
use paperskim::pipeline::{Pipeline, PipelineConfig};
use paperskim::store::JsonStore;
use paperskim::{extract, segment};

pub async fn run(
    file: &Path,
    output: Option<PathBuf>,
    model: Option<String>,
    store_dir: Option<PathBuf>,
    timeout: u64,
) -> Result<()> {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    eprintln!("📄 Summarizing: {}", file.display());

    let doc = super::decode_document(file)?;
    let extracted = extract::extract_runs(&doc.pages);

    if extracted.page_texts.iter().all(|t| t.trim().is_empty()) {
        anyhow::bail!("document has no extractable text: {}", file.display());
    }

    let segmentation = segment::segment(&extracted);
    let document_text = extract::document_text(&extracted.page_texts);

    let tables: Vec<TableText> = detect_tables(&doc.pages)
        .iter()
        .map(|t| TableText { label: t.label.clone(), text: t.to_text() })
        .collect();

    eprintln!(
        "   Sections: {} ({} pages, {} tables)",
        segmentation.sections.len(),
        extracted.page_count(),
        tables.len()
    );

    let oracle = match model {
        Some(model) => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .context("ANTHROPIC_API_KEY is not set")?;
            ClaudeOracle::new(api_key, model)?
        }
        None => ClaudeOracle::from_env()?,
    };

    let store = JsonStore::open(store_dir.unwrap_or_else(JsonStore::default_dir))?;

    let config = PipelineConfig { oracle_timeout: Duration::from_secs(timeout) };
    let pipeline = Pipeline::with_config(Arc::new(oracle), Arc::new(store), config);

    let start = std::time::Instant::now();
    let result = pipeline
        .run(&file_name, &segmentation, &document_text, tables)
        .await?;
    let elapsed = start.elapsed();

    let failed = result.section_summaries.iter().filter(|s| !s.succeeded()).count();
    eprintln!(
        "\n✅ Done in {:.1}s ({} section summaries, {} failed)",
        elapsed.as_secs_f64(),
        result.section_summaries.len(),
        failed
    );

    println!("Short Summary: {}", result.short_summary);
    println!("Global Summary: {}", result.global_summary);

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_vec_pretty(&result)?)?;
        eprintln!("📝 Saved full result to: {}", path.display());
    }

    Ok(())
}
