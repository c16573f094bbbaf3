//! Keyword-triggered scans for documented warnings (pitfalls) and for places
//! where the docs defer to material they don't contain (gaps).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::{KeywordRules, Severity};
use crate::corpus::Corpus;
use crate::util::{floor_char_boundary, take_chars};

const DESCRIPTION_CHARS: usize = 200;
const CONTEXT_FOLLOWING_LINES: usize = 2;
const GAP_WINDOW_BEFORE: usize = 50;
const GAP_WINDOW_AFTER: usize = 150;
const GAP_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitfall {
    pub description: String,
    pub source_url: String,
    pub severity: Severity,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub description: String,
    pub impact: Severity,
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

pub fn default_pitfall_keywords() -> Vec<String> {
    [
        "warning:",
        "note:",
        "important:",
        "⚠️",
        "caution:",
        "attention:",
        "gotcha",
        "common mistake",
        "pitfall",
        "error:",
        "fails",
        "deprecated",
        "breaking change",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_gap_indicators() -> Vec<String> {
    [
        "see documentation",
        "refer to",
        "advanced usage",
        "for more details",
        "coming soon",
        "todo",
        "wip",
        "not documented",
        "tbd",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_pitfall_severity() -> KeywordRules<Severity> {
    KeywordRules::new(
        vec![
            (Severity::High, &["critical", "breaking", "error"][..]),
            (Severity::Low, &["note", "tip"][..]),
        ],
        Severity::Medium,
    )
}

pub fn default_gap_impact() -> KeywordRules<Severity> {
    KeywordRules::new(
        vec![
            (Severity::High, &["important", "required", "must"][..]),
            (Severity::Low, &["optional", "advanced"][..]),
        ],
        Severity::Medium,
    )
}

/// One pitfall per matching line; the first keyword hit wins so a line is
/// never counted twice. Severity is judged on the matching line alone.
pub fn extract_pitfalls(
    corpus: &Corpus,
    keywords: &[String],
    severity_rules: &KeywordRules<Severity>,
) -> Vec<Pitfall> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut pitfalls = Vec::new();

    for page in &corpus.pages {
        let lines: Vec<&str> = page.content.split('\n').collect();

        for (i, line) in lines.iter().enumerate() {
            let line_lower = line.to_lowercase();
            if !keywords.iter().any(|k| line_lower.contains(k.as_str())) {
                continue;
            }

            let end = (i + 1 + CONTEXT_FOLLOWING_LINES).min(lines.len());
            let context = lines[i..end].join("\n").trim().to_string();

            pitfalls.push(Pitfall {
                description: take_chars(&context, DESCRIPTION_CHARS).to_string(),
                source_url: page.url.clone(),
                severity: severity_rules.classify(&line_lower),
                context,
            });
        }
    }

    pitfalls
}

/// One gap per indicator found on a page, at its first occurrence. Stops once
/// `max_gaps` have been collected; earlier pages win, nothing is ranked.
pub fn analyze_gaps(
    corpus: &Corpus,
    indicators: &[String],
    impact_rules: &KeywordRules<Severity>,
    max_gaps: usize,
) -> Vec<Gap> {
    let mut gaps = Vec::new();

    'pages: for page in &corpus.pages {
        // ASCII lowercasing keeps byte offsets aligned with the original text.
        let content_lower = page.content.to_ascii_lowercase();

        for indicator in indicators {
            if gaps.len() >= max_gaps {
                break 'pages;
            }
            let needle = indicator.to_ascii_lowercase();
            let Some(pos) = content_lower.find(needle.as_str()) else {
                continue;
            };

            let start = floor_char_boundary(&page.content, pos.saturating_sub(GAP_WINDOW_BEFORE));
            let end = floor_char_boundary(&page.content, pos + GAP_WINDOW_AFTER);
            let window = &page.content[start..end];

            gaps.push(Gap {
                description: format!(
                    "Reference to external documentation: {}...",
                    take_chars(window, GAP_PREVIEW_CHARS)
                ),
                impact: impact_rules.classify(&window.to_lowercase()),
                status: "to_research".to_string(),
                notes: format!("Found indicator: '{}'", indicator),
            });
        }
    }

    if gaps.len() >= max_gaps {
        debug!("Gap cap of {} reached", max_gaps);
    }
    gaps
}
