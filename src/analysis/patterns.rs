use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::examples::CodeExample;
use crate::util::group_in_order;

/// A line of code repeated across examples of the same language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    pub occurrences: usize,
    /// Indices into the corpus-wide example list
    pub example_ids: Vec<usize>,
    pub common_structure: String,
    #[serde(default)]
    pub variable_parts: Vec<String>,
}

/// Strategy for finding reusable structure across examples.
///
/// Consumers only see the `Pattern` shape, so token-normalized or AST-aware
/// detectors can replace the exact-line one without touching them.
pub trait PatternDetector: Send + Sync {
    fn detect(&self, examples: &[CodeExample]) -> Vec<Pattern>;
}

/// Exact text equality on trimmed lines, per language.
///
/// Only single repeated lines are found; multi-line structures are out of reach,
/// and `variable_parts` is always left empty.
#[derive(Debug, Clone)]
pub struct ExactLineDetector {
    pub min_line_len: usize,
    pub max_patterns: usize,
}

impl Default for ExactLineDetector {
    fn default() -> Self {
        Self {
            min_line_len: 10,
            max_patterns: 10,
        }
    }
}

impl PatternDetector for ExactLineDetector {
    fn detect(&self, examples: &[CodeExample]) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for (language, members) in group_in_order(examples, |e| e.language.as_str()) {
            if members.len() < 2 {
                continue;
            }

            // line -> example indices, in first-seen order
            let mut order: Vec<String> = Vec::new();
            let mut seen_in: HashMap<String, Vec<usize>> = HashMap::new();

            for &idx in &members {
                for line in examples[idx].code.split('\n') {
                    let line = line.trim();
                    if line.chars().count() < self.min_line_len {
                        continue;
                    }
                    let ids = seen_in.entry(line.to_string()).or_insert_with(|| {
                        order.push(line.to_string());
                        Vec::new()
                    });
                    if ids.last() != Some(&idx) {
                        ids.push(idx);
                    }
                }
            }

            for line in order {
                let ids = seen_in.remove(&line).unwrap_or_default();
                if ids.len() >= 2 {
                    patterns.push(Pattern {
                        name: format!("{} common pattern", language.to_uppercase()),
                        description: format!("Line appears in {} examples", ids.len()),
                        occurrences: ids.len(),
                        example_ids: ids,
                        common_structure: line,
                        variable_parts: Vec::new(),
                    });
                }
            }
        }

        // Stable: equal counts keep discovery order.
        patterns.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        patterns.truncate(self.max_patterns);
        debug!("Exact-line detector kept {} patterns", patterns.len());
        patterns
    }
}
