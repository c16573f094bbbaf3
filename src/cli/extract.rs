use anyhow::Result;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::corpus::{save_raw_docs, CorpusBuilder, RawFormat};

pub fn run(source: &str, output_dir: &str, format: &str) -> Result<()> {
    let format = RawFormat::from_str(format)?;
    info!("Extracting documentation from: {}", source);

    let corpus = CorpusBuilder::from_source(source)?;
    save_raw_docs(&corpus, Path::new(output_dir), format)?;

    println!("Extraction complete");
    println!("   Source: {}", corpus.source);
    println!("   Pages: {}", corpus.pages.len());
    println!(
        "   Total content: {} characters",
        corpus.total_content_length()
    );
    println!("   Output: {}", output_dir);
    Ok(())
}
