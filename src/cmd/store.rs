use std::path::PathBuf;

use anyhow::Result;
use paperskim::store::JsonStore;

pub async fn get(file_id: &str, store_dir: Option<PathBuf>) -> Result<()> {
    let store = JsonStore::open(store_dir.unwrap_or_else(JsonStore::default_dir))?;

    match store.document(file_id).await? {
        Some(doc) => {
            println!("📄 {}", doc.file);
            for entry in &doc.entries {
                let label = match entry.section_index {
                    Some(i) => format!("{} [{}]", entry.kind.as_str(), i),
                    None => entry.kind.as_str().to_string(),
                };
                println!("\n── {} ({}) ──", label, entry.saved_at.format("%Y-%m-%d %H:%M"));
                println!("{}", entry.text);
            }
        }
        None => {
            eprintln!("No stored summaries for: {file_id}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub async fn list(store_dir: Option<PathBuf>) -> Result<()> {
    let store = JsonStore::open(store_dir.unwrap_or_else(JsonStore::default_dir))?;

    let docs = store.list().await?;
    if docs.is_empty() {
        println!("Store is empty");
        return Ok(());
    }

    for doc in &docs {
        let latest = doc.entries.iter().map(|e| e.saved_at).max();
        match latest {
            Some(ts) => println!(
                "{} ({} entries, last {})",
                doc.file,
                doc.entries.len(),
                ts.format("%Y-%m-%d %H:%M")
            ),
            None => println!("{} (0 entries)", doc.file),
        }
    }

    Ok(())
}
