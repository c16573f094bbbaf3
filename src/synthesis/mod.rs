//! Template synthesis: turn extracted code examples and detected patterns into
//! reusable, placeholder-parameterized templates.

pub mod generalize;
pub mod output;
pub mod validate;

pub use generalize::{add_inline_comments, extract_placeholders, generalize_code, CommentHeader};
pub use output::{extension_for, render_usage, save_templates};
pub use validate::{validate_template, TemplateValidation};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisContext, CodeExample, ExampleType, Pattern};
use crate::config::SynthesisConfig;
use crate::util::group_in_order;
use generalize::{add_placeholders, FILE_PATH_RE, SHELL_PATH_RE, URL_RE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Basic,
    Advanced,
    Configuration,
    Workflow,
}

impl TemplateType {
    pub fn as_str(&self) -> &str {
        match self {
            TemplateType::Basic => "basic",
            TemplateType::Advanced => "advanced",
            TemplateType::Configuration => "configuration",
            TemplateType::Workflow => "workflow",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub language: String,
    pub content: String,
    /// Always the `${NAME}` tokens found in `content`, sorted
    #[serde(default)]
    pub placeholders: Vec<String>,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub usage_example: String,
    /// Indices into the analysis context's example list
    #[serde(default)]
    pub source_examples: Vec<usize>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

pub struct TemplateSynthesizer {
    config: SynthesisConfig,
}

impl TemplateSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// One basic template per language, then one advanced template per pattern
    /// that touches that language's examples.
    pub fn synthesize(&self, context: &AnalysisContext) -> Vec<Template> {
        let tool = context.tool_type.as_str();
        let examples = &context.examples;
        info!("Synthesizing templates for {} tool", tool);
        info!(
            "Input: {} examples, {} patterns",
            examples.len(),
            context.patterns.len()
        );

        let mut templates = Vec::new();

        for (language, members) in group_in_order(examples, |e| e.language.as_str()) {
            debug!("Processing {} {} examples", members.len(), language);

            if let Some(basic) = basic_template(examples, &members, &language, tool) {
                templates.push(basic);
            }

            if self.config.advanced_templates {
                templates.extend(pattern_templates(
                    examples,
                    &context.patterns,
                    &members,
                    &language,
                    tool,
                ));
            }
        }

        if self.config.validate {
            for template in &templates {
                let result = validate_template(template);
                for warning in &result.warnings {
                    warn!("{}: {}", template.name, warning);
                }
            }
        }

        info!("Generated {} templates", templates.len());
        templates
    }
}

impl Default for TemplateSynthesizer {
    fn default() -> Self {
        Self::new(SynthesisConfig::default())
    }
}

/// Built from the simplest non-empty example: explicitly basic ones first,
/// then shortest.
fn basic_template(
    examples: &[CodeExample],
    members: &[usize],
    language: &str,
    tool: &str,
) -> Option<Template> {
    let idx = members
        .iter()
        .copied()
        .filter(|&i| !examples[i].code.is_empty())
        .min_by_key(|&i| {
            (
                examples[i].example_type != ExampleType::Basic,
                examples[i].code.chars().count(),
            )
        })?;
    let source = &examples[idx];
    debug!("Creating basic template from: {}", source.title);

    let content = add_inline_comments(
        &generalize_code(&source.code, language),
        &CommentHeader {
            title: Some(&source.title),
            context: Some(&source.context),
        },
        language,
    );

    let mut metadata = Map::new();
    metadata.insert("source_title".to_string(), json!(source.title));

    Some(finish(
        Template {
            name: format!("{}_{}_basic", tool, language),
            template_type: TemplateType::Basic,
            language: language.to_string(),
            content,
            placeholders: Vec::new(),
            defaults: BTreeMap::new(),
            usage_example: String::new(),
            source_examples: vec![idx],
            metadata,
        },
        &[source],
    ))
}

/// Patterns carry no variable parts today, so these templates are the repeated
/// line plus the comment header.
fn pattern_templates(
    examples: &[CodeExample],
    patterns: &[Pattern],
    members: &[usize],
    language: &str,
    tool: &str,
) -> Vec<Template> {
    let mut templates = Vec::new();

    for pattern in patterns {
        if pattern.common_structure.is_empty() {
            continue;
        }
        let ids: Vec<usize> = pattern
            .example_ids
            .iter()
            .copied()
            .filter(|id| members.contains(id))
            .collect();
        if ids.is_empty() {
            continue;
        }

        let content = add_inline_comments(
            &add_placeholders(&pattern.common_structure, &pattern.variable_parts),
            &CommentHeader {
                title: None,
                context: Some(&pattern.description),
            },
            language,
        );

        let mut metadata = Map::new();
        metadata.insert("pattern_name".to_string(), json!(pattern.name));
        metadata.insert(
            "pattern_description".to_string(),
            json!(pattern.description),
        );

        let sources: Vec<&CodeExample> = ids.iter().map(|&i| &examples[i]).collect();
        templates.push(finish(
            Template {
                name: format!("{}_{}_pattern_{}", tool, language, templates.len() + 1),
                template_type: TemplateType::Advanced,
                language: language.to_string(),
                content,
                placeholders: Vec::new(),
                defaults: BTreeMap::new(),
                usage_example: String::new(),
                source_examples: ids,
                metadata,
            },
            &sources,
        ));
    }

    templates
}

/// Derive placeholders from the final content, infer defaults from the source
/// examples, then render the usage doc.
fn finish(mut template: Template, sources: &[&CodeExample]) -> Template {
    template.placeholders = extract_placeholders(&template.content);
    template.defaults = infer_defaults(&template.placeholders, sources);
    debug!(
        "{}: {} placeholders, {} defaults",
        template.name,
        template.placeholders.len(),
        template.defaults.len()
    );
    template.usage_example = render_usage(&template, sources.first().copied());
    template
}

/// URL and FILE/PATH placeholders take the first matching literal from the
/// source example code; anything else gets no default. Paths are searched
/// with URLs blanked out, so a URL's path segment never becomes a file default.
pub fn infer_defaults(placeholders: &[String], sources: &[&CodeExample]) -> BTreeMap<String, String> {
    let mut defaults = BTreeMap::new();

    for name in placeholders {
        let found = if name.contains("URL") {
            sources
                .iter()
                .find_map(|e| URL_RE.find(&e.code).map(|m| m.as_str().to_string()))
        } else if name.contains("FILE") || name.contains("PATH") {
            sources.iter().find_map(|e| {
                let without_urls = URL_RE.replace_all(&e.code, " ");
                SHELL_PATH_RE
                    .find(&without_urls)
                    .or_else(|| FILE_PATH_RE.find(&without_urls))
                    .map(|m| m.as_str().to_string())
            })
        } else {
            continue;
        };

        if let Some(value) = found {
            defaults.insert(name.clone(), value);
        }
    }

    defaults
}
