use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use super::{Template, TemplateType};
use crate::analysis::CodeExample;
use crate::error::InputError;

pub const METADATA_FILE: &str = "_templates_metadata.json";

pub fn extension_for(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "python" | "py" => ".py",
        "bash" | "shell" | "sh" => ".sh",
        "javascript" | "js" => ".js",
        "typescript" | "ts" => ".ts",
        "yaml" => ".yaml",
        "json" => ".json",
        _ => ".txt",
    }
}

/// Markdown usage doc for a template, showing the first source example verbatim.
pub fn render_usage(template: &Template, source: Option<&CodeExample>) -> String {
    let mut lines = vec![
        format!("## Usage: {}", template.name),
        String::new(),
        format!("**Type:** {}", template.template_type),
        format!("**Language:** {}", template.language),
        String::new(),
    ];

    if let Some(context) = source.map(|s| s.context.as_str()).filter(|c| !c.is_empty()) {
        lines.push(format!("**Description:** {}", context));
        lines.push(String::new());
    }

    if !template.placeholders.is_empty() {
        lines.push("**Placeholders:**".to_string());
        for name in &template.placeholders {
            let default = template
                .defaults
                .get(name)
                .map(String::as_str)
                .unwrap_or("No default");
            lines.push(format!("- `${{{}}}`: {}", name, default));
        }
        lines.push(String::new());
    }

    lines.push("**Template:**".to_string());
    lines.push(format!("```{}", template.language));
    lines.push(template.content.clone());
    lines.push("```".to_string());
    lines.push(String::new());

    if let Some(source) = source.filter(|s| !s.code.is_empty()) {
        lines.push("**Example from documentation:**".to_string());
        lines.push(format!("```{}", template.language));
        lines.push(source.code.clone());
        lines.push("```".to_string());
    }

    lines.join("\n")
}

#[derive(Serialize)]
struct TemplateRecord<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    template_type: TemplateType,
    language: &'a str,
    placeholders: &'a [String],
    defaults: &'a BTreeMap<String, String>,
    source_examples: &'a [usize],
    metadata: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct TemplatesMetadata<'a> {
    templates: Vec<TemplateRecord<'a>>,
    created_at: String,
    total_templates: usize,
}

/// Write `<name><ext>` and `<name>_USAGE.md` per template plus the metadata
/// index. The creation timestamp lives only in the index.
pub fn save_templates(templates: &[Template], output_dir: &Path) -> Result<(), InputError> {
    fs::create_dir_all(output_dir).map_err(|e| InputError::io(output_dir, e))?;
    info!(
        "Saving {} templates to: {}",
        templates.len(),
        output_dir.display()
    );

    for template in templates {
        let file = output_dir.join(format!(
            "{}{}",
            template.name,
            extension_for(&template.language)
        ));
        fs::write(&file, &template.content).map_err(|e| InputError::io(&file, e))?;

        let usage = output_dir.join(format!("{}_USAGE.md", template.name));
        fs::write(&usage, &template.usage_example).map_err(|e| InputError::io(&usage, e))?;
    }

    let index = TemplatesMetadata {
        templates: templates
            .iter()
            .map(|t| TemplateRecord {
                name: &t.name,
                template_type: t.template_type,
                language: &t.language,
                placeholders: &t.placeholders,
                defaults: &t.defaults,
                source_examples: &t.source_examples,
                metadata: &t.metadata,
            })
            .collect(),
        created_at: chrono::Utc::now().to_rfc3339(),
        total_templates: templates.len(),
    };

    let path = output_dir.join(METADATA_FILE);
    let body = serde_json::to_string_pretty(&index).map_err(|e| InputError::json(&path, e))?;
    fs::write(&path, body).map_err(|e| InputError::io(&path, e))?;

    info!("Saved {} templates + metadata", templates.len());
    Ok(())
}
