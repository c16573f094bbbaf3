//! Documentation analysis: classify the corpus and pull workflows, examples,
//! patterns, pitfalls and gaps out of unstructured text.

pub mod classifier;
pub mod examples;
pub mod patterns;
pub mod pitfalls;
pub mod rules;
pub mod workflows;

pub use classifier::{classify_tool_type, ClassifierSettings, Classification, ToolType};
pub use examples::{extract_examples, CodeExample, ExampleType};
pub use patterns::{ExactLineDetector, Pattern, PatternDetector};
pub use pitfalls::{analyze_gaps, extract_pitfalls, Gap, Pitfall};
pub use rules::{KeywordRules, Severity};
pub use workflows::{extract_workflows, Workflow};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::corpus::Corpus;
use crate::error::InputError;

/// Complete analysis results for one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub tool_type: ToolType,
    pub tool_type_confidence: f64,
    pub tool_type_reasoning: Vec<String>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(default)]
    pub examples: Vec<CodeExample>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub pitfalls: Vec<Pitfall>,
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AnalysisContext {
    pub fn summary(&self) -> String {
        format!(
            "Analysis Summary:\n\
             - Tool Type: {} (confidence: {:.0}%)\n\
             - Workflows: {}\n\
             - Examples: {}\n\
             - Patterns: {}\n\
             - Pitfalls: {}\n\
             - Gaps: {}\n",
            self.tool_type,
            self.tool_type_confidence * 100.0,
            self.workflows.len(),
            self.examples.len(),
            self.patterns.len(),
            self.pitfalls.len(),
            self.gaps.len()
        )
    }
}

pub struct DocAnalyzer {
    config: AnalysisConfig,
    detector: Box<dyn PatternDetector>,
}

impl DocAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let detector = Box::new(ExactLineDetector {
            min_line_len: config.min_pattern_line_len,
            max_patterns: config.max_patterns,
        });
        Self { config, detector }
    }

    /// Swap in a different pattern detection strategy.
    pub fn with_pattern_detector(mut self, detector: Box<dyn PatternDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Run every analysis stage over the corpus, in order.
    pub fn analyze(&self, corpus: &Corpus) -> AnalysisContext {
        info!("Analyzing corpus: {}", corpus.source);
        info!("Pages to analyze: {}", corpus.pages.len());

        let cfg = &self.config;

        let classification = classify_tool_type(
            corpus,
            &ClassifierSettings {
                table: &cfg.indicators,
                reasoning_threshold: cfg.reasoning_threshold,
                max_reasoning: cfg.max_reasoning,
            },
        );
        info!(
            "Tool type: {} (confidence: {:.0}%)",
            classification.tool_type,
            classification.confidence * 100.0
        );

        let workflows = extract_workflows(corpus, &cfg.workflow_headers);
        info!("Workflows identified: {}", workflows.len());

        let examples = extract_examples(corpus, &cfg.example_types);
        info!("Examples extracted: {}", examples.len());

        let patterns = self.detector.detect(&examples);
        info!("Patterns found: {}", patterns.len());

        let pitfalls = extract_pitfalls(corpus, &cfg.pitfall_keywords, &cfg.pitfall_severity);
        info!("Pitfalls identified: {}", pitfalls.len());

        let gaps = analyze_gaps(corpus, &cfg.gap_indicators, &cfg.gap_impact, cfg.max_gaps);
        info!("Gaps found: {}", gaps.len());

        let total_content_length: usize = corpus
            .pages
            .iter()
            .map(|p| p.content.chars().count())
            .sum::<usize>()
            + corpus.pages.len().saturating_sub(1) * 2;

        let mut metadata = Map::new();
        metadata.insert("source".to_string(), json!(corpus.source));
        metadata.insert("pages_analyzed".to_string(), json!(corpus.pages.len()));
        metadata.insert(
            "total_content_length".to_string(),
            json!(total_content_length),
        );

        AnalysisContext {
            tool_type: classification.tool_type,
            tool_type_confidence: classification.confidence,
            tool_type_reasoning: classification.reasoning,
            workflows,
            examples,
            patterns,
            pitfalls,
            gaps,
            metadata,
        }
    }
}

impl Default for DocAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

pub fn save_analysis(context: &AnalysisContext, path: &Path) -> Result<(), InputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| InputError::io(parent, e))?;
    }
    let body = serde_json::to_string_pretty(context).map_err(|e| InputError::json(path, e))?;
    fs::write(path, body).map_err(|e| InputError::io(path, e))?;
    info!("Analysis saved to: {}", path.display());
    Ok(())
}

pub fn load_analysis(path: &Path) -> Result<AnalysisContext, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|e| InputError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| InputError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Page;

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
    fn test_empty_corpus_is_total() {
        let corpus = Corpus::new("empty", vec![], Map::new());
        let context = DocAnalyzer::default().analyze(&corpus);
        assert_eq!(context.tool_type, ToolType::Unknown);
        assert_eq!(context.tool_type_confidence, 0.0);
        assert!(context.workflows.is_empty());
        assert!(context.examples.is_empty());
        assert!(context.patterns.is_empty());
        assert!(context.pitfalls.is_empty());
        assert!(context.gaps.is_empty());
        assert_eq!(context.metadata["pages_analyzed"], 0);
        assert_eq!(context.metadata["total_content_length"], 0);
    }

    #[test]
    fn test_metadata_fields() {
        let context = DocAnalyzer::default().analyze(&corpus_of("hello"));
        assert_eq!(context.metadata["source"], "docs");
        assert_eq!(context.metadata["pages_analyzed"], 1);
        assert_eq!(context.metadata["total_content_length"], 5);
    }

    #[test]
    fn test_summary_lists_counts() {
        let context = DocAnalyzer::default().analyze(&corpus_of("```bash\necho hi\n```"));
        let summary = context.summary();
        assert!(summary.contains("- Examples: 1"));
        assert!(summary.contains("- Tool Type: cli (confidence: 100%)"));
    }

    struct NoPatterns;

    impl PatternDetector for NoPatterns {
        fn detect(&self, _examples: &[CodeExample]) -> Vec<Pattern> {
            Vec::new()
        }
    }

    #[test]
    fn test_custom_pattern_detector() {
        let content = "```py\nimport requests_lib\n```\n```py\nimport requests_lib\n```";
        let default_ctx = DocAnalyzer::default().analyze(&corpus_of(content));
        assert_eq!(default_ctx.patterns.len(), 1);

        let custom_ctx = DocAnalyzer::default()
            .with_pattern_detector(Box::new(NoPatterns))
            .analyze(&corpus_of(content));
        assert!(custom_ctx.patterns.is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let context = DocAnalyzer::default().analyze(&corpus_of("zzz"));
        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(value["tool_type"], "unknown");
        assert!(value["tool_type_confidence"].is_number());
        for key in ["workflows", "examples", "patterns", "pitfalls", "gaps"] {
            assert!(value[key].is_array(), "{} should be an array", key);
        }
    }
}
