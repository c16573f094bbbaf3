//! Corpus builder: turns raw documentation into (url, title, content) pages.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::InputError;
use crate::util::sanitize_filename;

/// A single documentation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Collection of documentation pages analyzed as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub source: String,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Corpus {
    /// Build a corpus, stamping `extraction_date` into metadata if absent.
    pub fn new(source: impl Into<String>, pages: Vec<Page>, mut metadata: Map<String, Value>) -> Self {
        metadata
            .entry("extraction_date")
            .or_insert_with(|| json!(chrono::Utc::now().to_rfc3339()));
        Self {
            source: source.into(),
            pages,
            metadata,
        }
    }

    /// Total content length across all pages, in chars.
    pub fn total_content_length(&self) -> usize {
        self.pages.iter().map(|p| p.content.chars().count()).sum()
    }

    pub fn page_by_url(&self, url: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.url == url)
    }
}

/// On-disk layout for raw extracted docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    Markdown,
    Json,
}

impl std::str::FromStr for RawFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(RawFormat::Markdown),
            "json" => Ok(RawFormat::Json),
            _ => anyhow::bail!("Unknown format: {}", s),
        }
    }
}

pub struct CorpusBuilder;

impl CorpusBuilder {
    /// Dispatch on the source string: URLs go to the fetch stub, anything else
    /// is treated as a local markdown file or directory.
    pub fn from_source(source: &str) -> Result<Corpus, InputError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Ok(Self::from_url(source))
        } else {
            Self::from_markdown(Path::new(source))
        }
    }

    /// Remote extraction is not wired up; this yields an empty stub corpus.
    pub fn from_url(url: &str) -> Corpus {
        warn!("Live URL extraction is not supported, producing stub corpus for {}", url);
        let mut metadata = Map::new();
        metadata.insert("extraction_method".to_string(), json!("url_stub"));
        metadata.insert("total_files".to_string(), json!(0));
        Corpus::new(url, Vec::new(), metadata)
    }

    /// Extract pages from a markdown file or a directory of markdown files.
    pub fn from_markdown(path: &Path) -> Result<Corpus, InputError> {
        if !path.exists() {
            return Err(InputError::NotFound(path.to_path_buf()));
        }

        let mut pages = Vec::new();

        if path.is_file() {
            info!("Extracting from file: {}", path.display());
            if let Some(page) = Self::read_markdown_file(path)? {
                pages.push(page);
            }
        } else if path.is_dir() {
            info!("Extracting from directory: {}", path.display());
            let mut md_files = Vec::new();
            Self::collect_md_files(path, &mut md_files)?;
            md_files.sort();
            info!("Found {} markdown files", md_files.len());

            for md_file in &md_files {
                match Self::read_markdown_file(md_file) {
                    Ok(Some(page)) => pages.push(page),
                    Ok(None) => {}
                    Err(e) => warn!("Failed to extract {}: {}", md_file.display(), e),
                }
            }
        } else {
            return Err(InputError::InvalidPath(path.to_path_buf()));
        }

        let source = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();

        let mut metadata = Map::new();
        metadata.insert("extraction_method".to_string(), json!("markdown"));
        metadata.insert("total_files".to_string(), json!(pages.len()));
        let corpus = Corpus::new(source, pages, metadata);

        info!(
            "Extracted {} pages ({} chars)",
            corpus.pages.len(),
            corpus.total_content_length()
        );
        Ok(corpus)
    }

    /// Recursively collect `*.md` files
    fn collect_md_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), InputError> {
        let entries = fs::read_dir(dir).map_err(|e| InputError::io(dir, e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                if path.extension().and_then(|e| e.to_str()) == Some("md") {
                    files.push(path);
                }
            } else if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if matches!(name, ".git" | "node_modules" | "target") {
                        continue;
                    }
                }
                Self::collect_md_files(&path, files)?;
            }
        }
        Ok(())
    }

    /// Read one markdown file. Returns `None` for empty files so they never
    /// reach analysis.
    fn read_markdown_file(path: &Path) -> Result<Option<Page>, InputError> {
        let content = fs::read_to_string(path).map_err(|e| InputError::io(path, e))?;
        if content.trim().is_empty() {
            debug!("Skipping empty file: {}", path.display());
            return Ok(None);
        }

        let title = content
            .split('\n')
            .find_map(|line| line.strip_prefix("# ").map(|t| t.trim().to_string()))
            .unwrap_or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("untitled")
                    .to_string()
            });

        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let mut metadata = Map::new();
        metadata.insert("file_path".to_string(), json!(path.display().to_string()));
        metadata.insert("file_size".to_string(), json!(file_size));

        Ok(Some(Page {
            url: format!("file://{}", absolute.display()),
            title,
            content,
            metadata,
        }))
    }
}

/// Save raw documentation to disk in the given format.
pub fn save_raw_docs(corpus: &Corpus, output_dir: &Path, format: RawFormat) -> Result<(), InputError> {
    fs::create_dir_all(output_dir).map_err(|e| InputError::io(output_dir, e))?;
    info!("Saving raw docs to: {}", output_dir.display());

    match format {
        RawFormat::Markdown => {
            let extracted = corpus
                .metadata
                .get("extraction_date")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            for (i, page) in corpus.pages.iter().enumerate() {
                let filename = format!("page_{:03}_{}.md", i, sanitize_filename(&page.title));
                let file_path = output_dir.join(filename);
                let content = format!(
                    "---\nurl: {}\ntitle: {}\nextracted: {}\n---\n\n{}\n",
                    page.url, page.title, extracted, page.content
                );
                fs::write(&file_path, content).map_err(|e| InputError::io(&file_path, e))?;
            }

            let metadata_file = output_dir.join("_metadata.json");
            let body = serde_json::to_string_pretty(&corpus.metadata)
                .map_err(|e| InputError::json(&metadata_file, e))?;
            fs::write(&metadata_file, body).map_err(|e| InputError::io(&metadata_file, e))?;
            info!("Saved {} pages + metadata", corpus.pages.len());
        }
        RawFormat::Json => {
            let json_file = output_dir.join("corpus.json");
            let body =
                serde_json::to_string_pretty(corpus).map_err(|e| InputError::json(&json_file, e))?;
            fs::write(&json_file, body).map_err(|e| InputError::io(&json_file, e))?;
            info!("Saved corpus as JSON: {}", json_file.display());
        }
    }

    Ok(())
}

/// Load a corpus from a `corpus.json` file or a directory containing one.
/// Pages with empty content are dropped.
pub fn load_corpus(path: &Path) -> Result<Corpus, InputError> {
    let corpus_file = if path.is_dir() {
        path.join("corpus.json")
    } else {
        path.to_path_buf()
    };

    if !corpus_file.exists() {
        return Err(InputError::NotFound(corpus_file));
    }

    let raw = fs::read_to_string(&corpus_file).map_err(|e| InputError::io(&corpus_file, e))?;
    let mut corpus: Corpus =
        serde_json::from_str(&raw).map_err(|e| InputError::json(&corpus_file, e))?;

    let before = corpus.pages.len();
    corpus.pages.retain(|p| !p.content.trim().is_empty());
    if corpus.pages.len() < before {
        debug!("Dropped {} empty pages", before - corpus.pages.len());
    }

    info!(
        "Loaded corpus {} ({} pages)",
        corpus.source,
        corpus.pages.len()
    );
    Ok(corpus)
}
