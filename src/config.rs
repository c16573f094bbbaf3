use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::analysis::classifier::{default_indicator_table, IndicatorTable};
use crate::analysis::examples::{default_example_type_rules, ExampleType};
use crate::analysis::pitfalls::{
    default_gap_impact, default_gap_indicators, default_pitfall_keywords,
    default_pitfall_severity,
};
use crate::analysis::rules::{KeywordRules, Severity};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// Every fixed table and cap the analyzers use. Passed explicitly into each
/// stage so analysis stays a pure function of (corpus, config).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// An indicator adds a reasoning line when counted more than this (default: 2)
    #[serde(default = "default_reasoning_threshold")]
    pub reasoning_threshold: usize,

    #[serde(default = "default_max_reasoning")]
    pub max_reasoning: usize,

    /// Shortest trimmed line considered for pattern detection (default: 10)
    #[serde(default = "default_min_pattern_line_len")]
    pub min_pattern_line_len: usize,

    #[serde(default = "default_max_patterns")]
    pub max_patterns: usize,

    #[serde(default = "default_max_gaps")]
    pub max_gaps: usize,

    #[serde(default = "default_workflow_headers")]
    pub workflow_headers: Vec<String>,

    #[serde(default = "default_pitfall_keywords")]
    pub pitfall_keywords: Vec<String>,

    #[serde(default = "default_gap_indicators")]
    pub gap_indicators: Vec<String>,

    /// Tool-type indicator lists; order doubles as tie-break priority
    #[serde(default = "default_indicator_table")]
    pub indicators: IndicatorTable,

    #[serde(default = "default_pitfall_severity")]
    pub pitfall_severity: KeywordRules<Severity>,

    #[serde(default = "default_gap_impact")]
    pub gap_impact: KeywordRules<Severity>,

    /// Heading keywords that mark an example as advanced / edge case
    #[serde(default = "default_example_type_rules")]
    pub example_types: KeywordRules<ExampleType>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: default_indicator_table(),
            reasoning_threshold: default_reasoning_threshold(),
            max_reasoning: default_max_reasoning(),
            workflow_headers: default_workflow_headers(),
            pitfall_keywords: default_pitfall_keywords(),
            pitfall_severity: default_pitfall_severity(),
            gap_indicators: default_gap_indicators(),
            gap_impact: default_gap_impact(),
            example_types: default_example_type_rules(),
            min_pattern_line_len: default_min_pattern_line_len(),
            max_patterns: default_max_patterns(),
            max_gaps: default_max_gaps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Run the advisory syntax check on each template (default: true)
    #[serde(default = "default_true")]
    pub validate: bool,

    /// Build advanced templates from detected patterns (default: true)
    #[serde(default = "default_true")]
    pub advanced_templates: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            validate: true,
            advanced_templates: true,
        }
    }
}

fn default_reasoning_threshold() -> usize {
    2
}

fn default_max_reasoning() -> usize {
    5
}

fn default_workflow_headers() -> Vec<String> {
    [
        "workflow",
        "quick start",
        "getting started",
        "how to",
        "tutorial",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_min_pattern_line_len() -> usize {
    10
}

fn default_max_patterns() -> usize {
    10
}

fn default_max_gaps() -> usize {
    20
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from the working directory or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // An explicit path must load; a broken one is an input error
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path));
        }

        if let Ok(config) = Self::load_from_path("skillsmith.toml") {
            debug!("Loaded config from ./skillsmith.toml");
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("skillsmith").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::ToolType;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.max_patterns, 10);
        assert_eq!(config.analysis.max_gaps, 20);
        assert_eq!(config.analysis.max_reasoning, 5);
        assert_eq!(config.analysis.min_pattern_line_len, 10);
        assert_eq!(config.analysis.indicators.len(), 4);
        assert_eq!(config.analysis.indicators[0].tool_type, ToolType::Cli);
        assert!(config.synthesis.validate);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("max_gaps = 20"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.analysis.pitfall_keywords, config.analysis.pitfall_keywords);
        assert_eq!(parsed.analysis.gap_impact, config.analysis.gap_impact);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[analysis]
max_gaps = 5
workflow_headers = ["recipe"]

[analysis.pitfall_severity]
fallback = "low"

[[analysis.pitfall_severity.rules]]
level = "high"
keywords = ["danger"]
"#,
        )
        .unwrap();
        assert_eq!(parsed.analysis.max_gaps, 5);
        assert_eq!(parsed.analysis.workflow_headers, vec!["recipe".to_string()]);
        assert_eq!(parsed.analysis.max_patterns, 10);
        assert_eq!(parsed.analysis.pitfall_severity.classify("danger zone"), Severity::High);
        assert_eq!(parsed.analysis.pitfall_severity.classify("error"), Severity::Low);
        assert!(parsed.synthesis.advanced_templates);
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let result = Config::load_with_path(Some("/nonexistent/skillsmith.toml".to_string()));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to load config"));
    }

    #[test]
    fn test_explicit_path_loads() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[synthesis]\nvalidate = false\n").unwrap();
        let config = Config::load_with_path(Some(path.display().to_string())).unwrap();
        assert!(!config.synthesis.validate);
        assert!(config.synthesis.advanced_templates);
    }
}
