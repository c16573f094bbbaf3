//! Configuration defaults and overrides flowing into the analyzer

use anyhow::Result;
use serde_json::Map;
use skillsmith::analysis::{DocAnalyzer, Severity, ToolType};
use skillsmith::config::Config;
use skillsmith::corpus::{Corpus, Page};
use std::fs;
use tempfile::TempDir;

fn corpus_of(content: &str) -> Corpus {
    Corpus::new(
        "docs",
        vec![Page {
            url: "file:///docs.md".to_string(),
            title: "Docs".to_string(),
            content: content.to_string(),
            metadata: Map::new(),
        }],
        Map::new(),
    )
}

#[test]
fn test_config_has_defaults() -> Result<()> {
    let config = Config::default();

    assert_eq!(config.analysis.max_patterns, 10);
    assert_eq!(config.analysis.max_gaps, 20);
    assert_eq!(config.analysis.reasoning_threshold, 2);
    assert_eq!(config.analysis.max_reasoning, 5);
    assert_eq!(config.analysis.workflow_headers.len(), 5);
    assert!(config.synthesis.validate);
    assert!(config.synthesis.advanced_templates);

    Ok(())
}

#[test]
fn test_indicator_table_order() -> Result<()> {
    let config = Config::default();
    let order: Vec<ToolType> = config
        .analysis
        .indicators
        .iter()
        .map(|i| i.tool_type)
        .collect();
    assert_eq!(
        order,
        vec![ToolType::Cli, ToolType::Api, ToolType::Library, ToolType::Framework]
    );
    Ok(())
}

#[test]
fn test_toml_overrides_reach_analysis() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("skillsmith.toml");
    fs::write(
        &path,
        r#"
[analysis]
pitfall_keywords = ["heads up"]

[analysis.pitfall_severity]
fallback = "low"

[[analysis.pitfall_severity.rules]]
level = "high"
keywords = ["data loss"]

[[analysis.indicators]]
tool_type = "framework"
indicators = ["widget"]
"#,
    )?;

    let config = Config::load_with_path(Some(path.display().to_string()))?;
    let content = "Heads up: this may cause data loss.\nHeads up: harmless.\nWarning: ignored now.\nwidget widget";
    let context = DocAnalyzer::new(config.analysis).analyze(&corpus_of(content));

    assert_eq!(context.pitfalls.len(), 2);
    assert_eq!(context.pitfalls[0].severity, Severity::High);
    assert_eq!(context.pitfalls[1].severity, Severity::Low);
    assert_eq!(context.tool_type, ToolType::Framework);
    assert_eq!(context.tool_type_confidence, 1.0);
    Ok(())
}

#[test]
fn test_malformed_config_is_error() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("bad.toml");
    fs::write(&path, "[analysis\nmax_gaps = ")?;

    let result = Config::load_with_path(Some(path.display().to_string()));
    assert!(result.is_err());
    Ok(())
}
