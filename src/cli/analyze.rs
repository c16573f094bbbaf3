use anyhow::Result;
use std::path::Path;

use crate::analysis::{save_analysis, DocAnalyzer};
use crate::config::Config;
use crate::corpus::load_corpus;

/// Analyze a saved corpus. Without `--output` the summary is printed instead
/// of writing JSON.
pub fn run(corpus_path: &str, output: Option<String>, config_path: Option<String>) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let corpus = load_corpus(Path::new(corpus_path))?;

    let context = DocAnalyzer::new(config.analysis).analyze(&corpus);

    match output {
        Some(out) => {
            save_analysis(&context, Path::new(&out))?;
            println!("Analysis saved to: {}", out);
        }
        None => {
            println!("{}", "=".repeat(60));
            print!("{}", context.summary());
            println!("{}", "=".repeat(60));
        }
    }
    Ok(())
}
