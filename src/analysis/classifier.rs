use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::corpus::Corpus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Cli,
    Api,
    Library,
    Framework,
    Unknown,
}

impl ToolType {
    pub fn as_str(&self) -> &str {
        match self {
            ToolType::Cli => "cli",
            ToolType::Api => "api",
            ToolType::Library => "library",
            ToolType::Framework => "framework",
            ToolType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cli" | "command-line" => Ok(ToolType::Cli),
            "api" | "rest" => Ok(ToolType::Api),
            "library" | "lib" => Ok(ToolType::Library),
            "framework" => Ok(ToolType::Framework),
            "unknown" => Ok(ToolType::Unknown),
            _ => bail!("Unknown tool type: {}", s),
        }
    }
}

/// Indicator phrases scored for one tool type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolIndicators {
    pub tool_type: ToolType,
    pub indicators: Vec<String>,
}

/// Ordered indicator lists. Order is also the tie-break priority: on equal
/// scores the entry listed first wins.
pub type IndicatorTable = Vec<ToolIndicators>;

pub fn default_indicator_table() -> IndicatorTable {
    let table: [(ToolType, &[&str]); 4] = [
        (
            ToolType::Cli,
            &[
                "command", "flag", "option", "--", "usage:", "arguments:", "cli",
                "command-line", "terminal", "shell", "bash", "$",
            ],
        ),
        (
            ToolType::Api,
            &[
                "endpoint", "request", "response", "POST", "GET", "PUT", "DELETE", "api",
                "rest", "http", "json", "authentication", "header",
            ],
        ),
        (
            ToolType::Library,
            &[
                "import", "class", "function", "method", "module", "package", "install",
                "pip", "npm", "require", "from", "def ",
            ],
        ),
        (
            ToolType::Framework,
            &[
                "scaffold", "generate", "project", "app", "create-", "framework",
                "boilerplate", "template", "structure",
            ],
        ),
    ];

    table
        .iter()
        .map(|(tool_type, indicators)| ToolIndicators {
            tool_type: *tool_type,
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

/// Classifier tuning, taken from `AnalysisConfig`.
#[derive(Debug, Clone)]
pub struct ClassifierSettings<'a> {
    pub table: &'a [ToolIndicators],
    /// An indicator contributes a reasoning line when seen more than this many times.
    pub reasoning_threshold: usize,
    pub max_reasoning: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tool_type: ToolType,
    pub confidence: f64,
    pub reasoning: Vec<String>,
}

/// Score the corpus against every indicator list and pick the winner.
///
/// Counts are non-overlapping, case-insensitive substring occurrences over the
/// newline-joined corpus text. Confidence is the winner's share of the total.
pub fn classify_tool_type(corpus: &Corpus, settings: &ClassifierSettings<'_>) -> Classification {
    let full_content = corpus
        .pages
        .iter()
        .map(|p| p.content.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    let mut scores: Vec<(ToolType, usize)> = Vec::with_capacity(settings.table.len());
    let mut reasoning = Vec::new();

    for entry in settings.table {
        let mut score = 0;
        for indicator in &entry.indicators {
            let needle = indicator.to_lowercase();
            if needle.is_empty() {
                continue;
            }
            let count = full_content.matches(needle.as_str()).count();
            score += count;
            if count > settings.reasoning_threshold {
                reasoning.push(format!("Found '{}' {} times", indicator, count));
            }
        }
        debug!("{} score: {}", entry.tool_type, score);
        scores.push((entry.tool_type, score));
    }

    let total: usize = scores.iter().map(|(_, s)| s).sum();

    // First maximum in table order, so ties resolve by list priority.
    let winner = scores
        .iter()
        .fold(None::<(ToolType, usize)>, |best, &(tool, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((tool, score)),
        });

    match winner {
        Some((tool_type, score)) if score > 0 => {
            reasoning.truncate(settings.max_reasoning);
            Classification {
                tool_type,
                confidence: score as f64 / total as f64,
                reasoning,
            }
        }
        _ => Classification {
            tool_type: ToolType::Unknown,
            confidence: 0.0,
            reasoning: vec!["No clear indicators found".to_string()],
        },
    }
}
