//! Regex passes that swap concrete literals for `${NAME}` placeholders, plus the
//! comment decoration applied to every template body.

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

pub(crate) static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").expect("valid regex"));
static API_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z0-9]{32,}\b").expect("valid regex"));
pub(crate) static FILE_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:/[\w.-]+)+|(?:[\w.-]+/)+[\w.-]+").expect("valid regex"));

pub(crate) static SHELL_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(/[\w.-]+){2,}").expect("valid regex"));
static PY_CALL_ARG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([\w.]+\(['"])([^'"]+)(['"])"#).expect("valid regex"));
static JS_ASSIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(const|let|var)\s+(\w+)\s*=\s*['"]([^'"]+)['"]"#).expect("valid regex")
});

pub(crate) static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("valid regex"));
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid regex"));

/// Replace recognizable literals with placeholders.
///
/// Passes run in a fixed order (URL, email, API key, then one language pass),
/// and later passes see the output of earlier ones.
pub fn generalize_code(code: &str, language: &str) -> String {
    let mut out = URL_RE.replace_all(code, NoExpand("${URL}")).into_owned();
    out = EMAIL_RE.replace_all(&out, NoExpand("${EMAIL}")).into_owned();
    out = API_KEY_RE.replace_all(&out, NoExpand("${API_KEY}")).into_owned();

    match language {
        "bash" | "shell" | "sh" => SHELL_PATH_RE
            .replace_all(&out, NoExpand("${FILE_PATH}"))
            .into_owned(),
        "python" | "py" => PY_CALL_ARG_RE
            .replace_all(&out, |caps: &Captures| {
                format!("{}${{ARG}}{}", &caps[1], &caps[3])
            })
            .into_owned(),
        "javascript" | "js" | "typescript" | "ts" => JS_ASSIGN_RE
            .replace_all(&out, |caps: &Captures| {
                format!("{} {} = '${{VALUE}}'", &caps[1], &caps[2])
            })
            .into_owned(),
        _ => out,
    }
}

/// Replace each variable part with an uppercased placeholder derived from it.
pub fn add_placeholders(content: &str, variable_parts: &[String]) -> String {
    let mut result = content.to_string();
    for part in variable_parts.iter().filter(|p| !p.is_empty()) {
        let name = NON_WORD_RE.replace_all(part, "_").to_uppercase();
        result = result.replace(part.as_str(), &format!("${{{}}}", name));
    }
    result
}

/// Placeholder names in `content`, sorted and deduplicated.
pub fn extract_placeholders(content: &str) -> Vec<String> {
    let mut names: Vec<String> = PLACEHOLDER_RE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

pub fn comment_syntax(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "javascript" | "js" | "typescript" | "ts" | "java" | "go" | "rust" | "c" | "cpp" => {
            "//"
        }
        _ => "#",
    }
}

/// What the header comment block says about a template's origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentHeader<'a> {
    pub title: Option<&'a str>,
    pub context: Option<&'a str>,
}

/// Prepend a header block and put a "replace me" note above every line that
/// carries placeholders.
pub fn add_inline_comments(content: &str, header: &CommentHeader<'_>, language: &str) -> String {
    let c = comment_syntax(language);
    let mut lines = vec![format!(
        "{} Template: {}",
        c,
        header.title.unwrap_or("Generated Template")
    )];

    if let Some(context) = header.context.filter(|s| !s.trim().is_empty()) {
        for line in context.split('\n') {
            if line.trim().is_empty() {
                lines.push(c.to_string());
            } else {
                lines.push(format!("{} {}", c, line));
            }
        }
    }
    lines.push(c.to_string());

    for line in content.split('\n') {
        let names: Vec<&str> = PLACEHOLDER_RE
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();
        if !names.is_empty() {
            lines.push(format!("{} {}: Replace with your value", c, names.join(", ")));
        }
        lines.push(line.to_string());
    }

    lines.join("\n")
}
