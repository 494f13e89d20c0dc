use std::path::Path;

use anyhow::Result;
use paperskim::{extract, segment};

pub fn run(file: &Path) -> Result<()> {
    let doc = super::decode_document(file)?;
    let extracted = extract::extract_runs(&doc.pages);
    let segmentation = segment::segment(&extracted);

    println!("📄 {}", file.display());
    println!(
        "   {} pages, {} sections\n",
        extracted.page_count(),
        segmentation.sections.len()
    );

    for section in &segmentation.sections {
        let header = section.header.as_deref().unwrap_or("(untitled)");
        let chars = section.raw_text.chars().count();
        println!("{:>3}. {} ({} chars)", section.index + 1, header, chars);
    }

    Ok(())
}
