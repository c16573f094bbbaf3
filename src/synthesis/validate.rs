use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::generalize::comment_syntax;
use super::Template;

/// Outcome of the advisory syntax check. Only `errors` make a template invalid,
/// and even then it is still written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Cheap textual sanity checks; nothing is parsed or executed.
pub fn validate_template(template: &Template) -> TemplateValidation {
    let content = &template.content;
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    let open = content.matches("${").count();
    let close = content.matches('}').count();
    if open != close {
        errors.push(format!(
            "Mismatched placeholders: {} open, {} close",
            open, close
        ));
    }

    match template.language.as_str() {
        "python" | "py" => {
            if content.matches('\'').count() % 2 != 0 {
                warnings.push("Unmatched single quotes detected".to_string());
            }
            if content.matches('"').count() % 2 != 0 {
                warnings.push("Unmatched double quotes detected".to_string());
            }
            let tab_lines = content.split('\n').filter(|l| l.starts_with('\t')).count();
            let space_lines = content.split('\n').filter(|l| l.starts_with("    ")).count();
            if tab_lines > 0 && space_lines > 0 {
                warnings.push("Mixed tabs and spaces in indentation".to_string());
            }
        }
        "bash" | "shell" | "sh" => {
            if content.matches('"').count() % 2 != 0 {
                warnings.push("Unmatched double quotes in bash script".to_string());
            }
        }
        _ => {}
    }

    if template.placeholders.is_empty() {
        suggestions.push(
            "No placeholders found - consider if template needs variable parts".to_string(),
        );
    }
    if !content.contains(comment_syntax(&template.language)) {
        suggestions.push("Consider adding inline comments to explain usage".to_string());
    }

    let is_valid = errors.is_empty();
    if is_valid {
        debug!("Template '{}' validation passed", template.name);
    } else {
        warn!(
            "Template '{}' validation failed: {} errors",
            template.name,
            errors.len()
        );
    }

    TemplateValidation {
        is_valid,
        errors,
        warnings,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::TemplateType;

    fn template(language: &str, content: &str, placeholders: &[&str]) -> Template {
        Template {
            name: "t".to_string(),
            template_type: TemplateType::Basic,
            language: language.to_string(),
            content: content.to_string(),
            placeholders: placeholders.iter().map(|s| s.to_string()).collect(),
            defaults: Default::default(),
            usage_example: String::new(),
            source_examples: vec![0],
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_clean_template_is_valid() {
        let result = validate_template(&template("bash", "# run\ncurl ${URL}", &["URL"]));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_brace_mismatch_is_error() {
        let content = "# x\nd = {'a': 1}\nrun(${ARG})";
        let result = validate_template(&template("python", content, &["ARG"]));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Mismatched placeholders: 1 open, 2 close"]);
    }

    #[test]
    fn test_python_warnings() {
        let content = "# t\ndef f():\n\tx = 'a\n    y = 1";
        let result = validate_template(&template("python", content, &[]));
        assert!(result.is_valid);
        assert!(result
            .warnings
            .contains(&"Unmatched single quotes detected".to_string()));
        assert!(result
            .warnings
            .contains(&"Mixed tabs and spaces in indentation".to_string()));
        assert!(result.suggestions[0].starts_with("No placeholders found"));
    }

    #[test]
    fn test_shell_double_quote_warning() {
        let result = validate_template(&template("sh", "# t\necho \"hi", &[]));
        assert_eq!(result.warnings, vec!["Unmatched double quotes in bash script"]);
    }

    #[test]
    fn test_missing_comments_suggested() {
        let result = validate_template(&template("js", "run(${ARG})", &["ARG"]));
        assert_eq!(
            result.suggestions,
            vec!["Consider adding inline comments to explain usage"]
        );
    }
}
