use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::examples::CodeExample;
use crate::corpus::Corpus;

static NUMBERED_STEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("valid regex"));
static BULLET_STEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s").expect("valid regex"));

/// A named sequence of procedural steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub frequency: String,
    #[serde(default)]
    pub examples: Vec<CodeExample>,
    #[serde(default)]
    pub source_urls: Vec<String>,
}

impl Workflow {
    fn started_at(header_line: &str, url: &str) -> Self {
        Self {
            name: header_line.trim_matches('#').trim().to_string(),
            description: String::new(),
            steps: Vec::new(),
            frequency: "common".to_string(),
            examples: Vec::new(),
            source_urls: vec![url.to_string()],
        }
    }
}

/// Scan each page for workflow headers and the steps that follow them.
///
/// Any line containing a header keyword opens a new workflow, closing the
/// previous one. Numbered (`1.`) and bulleted (`- `) lines are collected as
/// steps while a workflow is open. Workflows that end without steps are dropped.
pub fn extract_workflows(corpus: &Corpus, header_keywords: &[String]) -> Vec<Workflow> {
    let keywords: Vec<String> = header_keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut workflows = Vec::new();

    for page in &corpus.pages {
        let mut current: Option<Workflow> = None;

        for line in page.content.split('\n') {
            let lower = line.to_lowercase();
            let trimmed = line.trim();

            if keywords.iter().any(|k| lower.contains(k.as_str())) {
                if let Some(done) = current.take() {
                    if !done.steps.is_empty() {
                        workflows.push(done);
                    }
                }
                current = Some(Workflow::started_at(trimmed, &page.url));
            } else if NUMBERED_STEP.is_match(trimmed) || BULLET_STEP.is_match(trimmed) {
                if let Some(workflow) = current.as_mut() {
                    workflow.steps.push(trimmed.to_string());
                }
            }
        }

        if let Some(done) = current {
            if !done.steps.is_empty() {
                workflows.push(done);
            }
        }
    }

    workflows
}
