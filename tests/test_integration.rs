// End-to-end tests: markdown on disk -> corpus -> analysis -> templates,
// both through the library stages and through the phased pipeline.

use anyhow::Result;
use serde_json::Map;
use skillsmith::analysis::{load_analysis, save_analysis, DocAnalyzer, ToolType};
use skillsmith::config::Config;
use skillsmith::corpus::{load_corpus, save_raw_docs, Corpus, CorpusBuilder, RawFormat};
use skillsmith::pipeline::{PipelineOptions, PipelineState, SkillCreator, STATE_FILE};
use skillsmith::synthesis::{save_templates, TemplateSynthesizer};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A small docs tree: two pages plus an empty file and an ignored directory
fn create_docs(base: &Path) -> Result<()> {
    fs::create_dir_all(base.join("guides"))?;
    fs::create_dir_all(base.join("node_modules/pkg"))?;

    fs::write(
        base.join("README.md"),
        "# pyclient\n\nA Python library. Install the package with pip.\n\n## Quick Start\n\n1. pip install pyclient\n2. import the module\n\n```python\nfrom pyclient import Client\nclient = Client('https://api.example.com')\n```\n",
    )?;
    fs::write(
        base.join("guides/auth.md"),
        "# Auth\n\nImportant: tokens are required.\n\n```python\nfrom pyclient import Client\nclient.login('admin@example.com')\n```\n\nFor more details, see documentation of the auth server.\n",
    )?;
    fs::write(base.join("guides/empty.md"), "   \n")?;
    fs::write(base.join("node_modules/pkg/README.md"), "# vendored\n")?;
    Ok(())
}

// ============================================================================
// Stage-by-stage
// ============================================================================

#[test]
fn test_stages_through_disk() -> Result<()> {
    let tmp = TempDir::new()?;
    let docs = tmp.path().join("docs");
    create_docs(&docs)?;

    let corpus = CorpusBuilder::from_markdown(&docs)?;
    assert_eq!(corpus.pages.len(), 2);
    assert_eq!(corpus.metadata["extraction_method"], "markdown");

    let raw = tmp.path().join("raw");
    save_raw_docs(&corpus, &raw, RawFormat::Json)?;
    let reloaded = load_corpus(&raw)?;
    assert_eq!(reloaded.pages, corpus.pages);

    let context = DocAnalyzer::default().analyze(&reloaded);
    assert_eq!(context.tool_type, ToolType::Library);
    assert_eq!(context.examples.len(), 2);
    assert_eq!(context.patterns.len(), 1);
    assert_eq!(context.patterns[0].common_structure, "from pyclient import Client");
    assert_eq!(context.metadata["pages_analyzed"], 2);

    let analysis_file = tmp.path().join("analysis.json");
    save_analysis(&context, &analysis_file)?;
    let loaded = load_analysis(&analysis_file)?;
    assert_eq!(loaded.examples, context.examples);
    assert_eq!(loaded.patterns, context.patterns);

    let templates = TemplateSynthesizer::default().synthesize(&loaded);
    let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["library_python_basic", "library_python_pattern_1"]);

    let out = tmp.path().join("templates");
    save_templates(&templates, &out)?;
    assert!(out.join("library_python_basic.py").exists());
    assert!(out.join("library_python_pattern_1_USAGE.md").exists());
    Ok(())
}

#[test]
fn test_empty_corpus_end_to_end() -> Result<()> {
    let corpus = Corpus::new("nothing", vec![], Map::new());
    let context = DocAnalyzer::default().analyze(&corpus);

    assert_eq!(context.tool_type, ToolType::Unknown);
    assert_eq!(context.tool_type_confidence, 0.0);
    assert!(context.workflows.is_empty());
    assert!(context.examples.is_empty());
    assert!(context.patterns.is_empty());
    assert!(context.pitfalls.is_empty());
    assert!(context.gaps.is_empty());

    let templates = TemplateSynthesizer::default().synthesize(&context);
    assert!(templates.is_empty());

    let tmp = TempDir::new()?;
    save_templates(&templates, tmp.path())?;
    let index: serde_json::Value = serde_json::from_str(&fs::read_to_string(
        tmp.path().join("_templates_metadata.json"),
    )?)?;
    assert_eq!(index["total_templates"], 0);
    Ok(())
}

#[test]
fn test_url_source_is_stubbed() -> Result<()> {
    let corpus = CorpusBuilder::from_source("https://docs.example.com/guide")?;
    assert!(corpus.pages.is_empty());
    assert_eq!(corpus.metadata["extraction_method"], "url_stub");

    let context = DocAnalyzer::default().analyze(&corpus);
    assert_eq!(context.tool_type, ToolType::Unknown);
    Ok(())
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_pipeline_full_run() -> Result<()> {
    let tmp = TempDir::new()?;
    let docs = tmp.path().join("docs");
    create_docs(&docs)?;
    let out = tmp.path().join("skill");

    let mut creator = SkillCreator::new(
        PipelineOptions::new(docs.display().to_string(), &out),
        Config::default(),
    );
    creator.run()?;

    assert!(out.join("extraction/corpus.json").exists());
    assert!(out.join("extraction/_metadata.json").exists());
    assert!(out.join("analysis.json").exists());
    assert!(out.join("templates/_templates_metadata.json").exists());

    let state: PipelineState = serde_json::from_str(&fs::read_to_string(out.join(STATE_FILE))?)?;
    assert_eq!(state.completed_phases, vec![1, 2, 3]);
    assert_eq!(state.current_phase, None);
    assert!(state.phase_outputs["ANALYSIS"].ends_with("analysis.json"));
    assert!(state.started_at.is_some());
    assert!(state.completed_at.is_some());
    Ok(())
}

#[test]
fn test_pipeline_reruns_are_identical() -> Result<()> {
    let tmp = TempDir::new()?;
    let docs = tmp.path().join("docs");
    create_docs(&docs)?;

    let mut outputs = Vec::new();
    for name in ["first", "second"] {
        let out = tmp.path().join(name);
        SkillCreator::new(
            PipelineOptions::new(docs.display().to_string(), &out),
            Config::default(),
        )
        .run()?;
        let analysis = fs::read_to_string(out.join("analysis.json"))?;
        let template = fs::read_to_string(out.join("templates/library_python_basic.py"))?;
        outputs.push((analysis, template));
    }

    assert_eq!(outputs[0], outputs[1]);
    Ok(())
}

#[test]
fn test_pipeline_resume_from_analysis() -> Result<()> {
    let tmp = TempDir::new()?;
    let docs = tmp.path().join("docs");
    create_docs(&docs)?;

    // Extraction only, done by hand
    let out = tmp.path().join("skill");
    let corpus = CorpusBuilder::from_markdown(&docs)?;
    save_raw_docs(&corpus, &out.join("extraction"), RawFormat::Json)?;

    let mut options = PipelineOptions::new(docs.display().to_string(), &out);
    options.from_phase = 2;
    let mut creator = SkillCreator::new(options, Config::default());
    let state = creator.run()?;

    assert_eq!(state.completed_phases, vec![2, 3]);
    assert!(out.join("templates/library_python_basic.py").exists());
    Ok(())
}
