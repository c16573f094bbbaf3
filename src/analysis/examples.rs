use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::rules::KeywordRules;
use crate::corpus::Corpus;
use crate::util::{floor_char_boundary, last_chars};

/// Fenced block: optional language tag, body, closing fence on its own line.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)\n```").expect("valid regex"));

const TITLE_WINDOW: usize = 200;
const CONTEXT_CHARS: usize = 100;
const TITLE_SEARCH_LINES: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleType {
    #[default]
    Basic,
    Advanced,
    EdgeCase,
}

impl fmt::Display for ExampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleType::Basic => write!(f, "basic"),
            ExampleType::Advanced => write!(f, "advanced"),
            ExampleType::EdgeCase => write!(f, "edge_case"),
        }
    }
}

pub fn default_example_type_rules() -> KeywordRules<ExampleType> {
    KeywordRules::new(
        vec![
            (
                ExampleType::EdgeCase,
                &["edge case", "corner case", "caveat"][..],
            ),
            (ExampleType::Advanced, &["advanced"][..]),
        ],
        ExampleType::Basic,
    )
}

/// A code example pulled from a fenced block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
    pub title: String,
    pub language: String,
    pub code: String,
    pub source_url: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub example_type: ExampleType,
}

/// Extract every fenced code block in corpus order (page order, then block order).
///
/// Untitled blocks are numbered by their position across the whole corpus.
pub fn extract_examples(corpus: &Corpus, type_rules: &KeywordRules<ExampleType>) -> Vec<CodeExample> {
    let mut examples = Vec::new();

    for page in &corpus.pages {
        let content = page.content.as_str();

        for caps in FENCED_BLOCK.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let language = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let code = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();

            let code_pos = whole.start();
            let window_start = floor_char_boundary(content, code_pos.saturating_sub(TITLE_WINDOW));
            let preceding = content[window_start..code_pos].trim();

            let title = nearest_heading(preceding)
                .unwrap_or_else(|| format!("Example {}", examples.len() + 1));
            let context = last_chars(preceding, CONTEXT_CHARS).to_string();
            let example_type =
                type_rules.classify(&format!("{}\n{}", title, context).to_lowercase());

            examples.push(CodeExample {
                title,
                language,
                code: code.to_string(),
                source_url: page.url.clone(),
                context,
                example_type,
            });
        }
    }

    examples
}

/// Closest markdown heading among the last few lines before a block. The
/// search stops at a fence line so comments inside an earlier block are never
/// taken for headings.
fn nearest_heading(preceding: &str) -> Option<String> {
    let lines: Vec<&str> = preceding.split('\n').collect();
    let start = lines.len().saturating_sub(TITLE_SEARCH_LINES);
    lines[start..]
        .iter()
        .rev()
        .take_while(|line| !line.trim_start().starts_with("```"))
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_matches('#').trim().to_string())
        .filter(|title| !title.is_empty())
}
