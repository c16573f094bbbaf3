use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-level rating used for pitfall severity and gap impact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Assign `level` when any keyword appears in the (lowercased) text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule<L> {
    pub level: L,
    pub keywords: Vec<String>,
}

/// Ordered keyword rules; the first rule with a hit wins, otherwise `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRules<L> {
    pub fallback: L,
    pub rules: Vec<KeywordRule<L>>,
}

impl<L: Clone> KeywordRules<L> {
    pub fn new(rules: Vec<(L, &[&str])>, fallback: L) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(level, keywords)| KeywordRule {
                    level,
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
            fallback,
        }
    }

    /// Classify already-lowercased text.
    pub fn classify(&self, text_lower: &str) -> L {
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| text_lower.contains(k.as_str())))
            .map(|rule| rule.level.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
