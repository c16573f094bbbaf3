use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::analysis::load_analysis;
use crate::config::{Config, SynthesisConfig};
use crate::synthesis::{save_templates, validate_template, TemplateSynthesizer};

pub fn run(
    analysis_file: &str,
    output_dir: &str,
    validate: bool,
    config_path: Option<String>,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let context = load_analysis(Path::new(analysis_file))?;

    if context.examples.is_empty() {
        warn!("No examples found in analysis file");
        return Ok(());
    }

    let templates =
        TemplateSynthesizer::new(synthesis_config(config.synthesis, validate)).synthesize(&context);
    if templates.is_empty() {
        warn!("No templates generated");
        return Ok(());
    }

    if validate {
        println!("Validating templates...");
        for template in &templates {
            let result = validate_template(template);
            if !result.errors.is_empty() {
                println!("  \u{2717} {}: {}", template.name, result.errors.join(", "));
            } else if !result.warnings.is_empty() {
                println!("  ! {}: {}", template.name, result.warnings.join(", "));
            } else {
                println!("  \u{2713} {}: valid", template.name);
            }
        }
    }

    save_templates(&templates, Path::new(output_dir))?;

    println!("Template synthesis complete");
    println!("   Templates generated: {}", templates.len());
    println!("   Output directory: {}", output_dir);
    Ok(())
}

/// The printed report replaces the synthesizer's own validation logging.
fn synthesis_config(mut config: SynthesisConfig, report: bool) -> SynthesisConfig {
    if report {
        config.validate = false;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{save_analysis, DocAnalyzer};
    use crate::corpus::{Corpus, Page};
    use serde_json::Map;

    #[test]
    fn test_report_disables_inner_validation() {
        let config = SynthesisConfig::default();
        assert!(config.validate);
        assert!(!synthesis_config(config.clone(), true).validate);
        assert!(synthesis_config(config, false).validate);
    }

    #[test]
    fn test_run_missing_analysis() {
        let result = run("/tmp/nonexistent-skillsmith-analysis.json", "out", false, None);
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_run_without_examples_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let analysis = dir.path().join("analysis.json");
        let context = DocAnalyzer::default().analyze(&Corpus::new("empty", vec![], Map::new()));
        save_analysis(&context, &analysis).unwrap();

        let out = dir.path().join("templates");
        run(analysis.to_str().unwrap(), out.to_str().unwrap(), true, None).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_run_saves_templates() {
        let dir = tempfile::TempDir::new().unwrap();
        let corpus = Corpus::new(
            "docs",
            vec![Page {
                url: "file:///docs.md".to_string(),
                title: "Docs".to_string(),
                content: "Run this shell command:\n```bash\ncat /etc/tool/config.yml\n```".to_string(),
                metadata: Map::new(),
            }],
            Map::new(),
        );
        let analysis = dir.path().join("analysis.json");
        save_analysis(&DocAnalyzer::default().analyze(&corpus), &analysis).unwrap();

        let out = dir.path().join("templates");
        run(analysis.to_str().unwrap(), out.to_str().unwrap(), true, None).unwrap();
        assert!(out.join("cli_bash_basic.sh").exists());
        assert!(out.join("_templates_metadata.json").exists());
    }
}
