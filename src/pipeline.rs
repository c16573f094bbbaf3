//! End-to-end driver: extraction, analysis and template synthesis as resumable
//! phases under one output directory.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analysis::{load_analysis, save_analysis, DocAnalyzer};
use crate::config::Config;
use crate::corpus::{load_corpus, save_raw_docs, CorpusBuilder, RawFormat};
use crate::synthesis::{save_templates, TemplateSynthesizer};

pub const STATE_FILE: &str = ".pipeline_state.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Extraction = 1,
    Analysis = 2,
    Templates = 3,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Extraction, Phase::Analysis, Phase::Templates];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Extraction => "EXTRACTION",
            Phase::Analysis => "ANALYSIS",
            Phase::Templates => "TEMPLATES",
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.number() == n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseError {
    pub phase: String,
    pub phase_number: u8,
    pub error: String,
    pub timestamp: String,
}

/// Persisted as `.pipeline_state.json` so a later run can resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub source: String,
    #[serde(default)]
    pub completed_phases: Vec<u8>,
    #[serde(default)]
    pub current_phase: Option<u8>,
    /// Phase name -> output path
    #[serde(default)]
    pub phase_outputs: BTreeMap<String, String>,
    #[serde(default)]
    pub errors: Vec<PhaseError>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl PipelineState {
    fn fresh(source: &str) -> Self {
        Self {
            source: source.to_string(),
            started_at: Some(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
    }

    pub fn is_phase_complete(&self, phase: Phase) -> bool {
        self.completed_phases.contains(&phase.number())
    }

    fn mark_phase_complete(&mut self, phase: Phase, output: Option<&Path>) {
        if !self.is_phase_complete(phase) {
            self.completed_phases.push(phase.number());
        }
        if let Some(output) = output {
            self.phase_outputs
                .insert(phase.as_str().to_string(), output.display().to_string());
        }
    }

    fn record_error(&mut self, phase: Phase, error: &anyhow::Error) {
        self.errors.push(PhaseError {
            phase: phase.as_str().to_string(),
            phase_number: phase.number(),
            error: format!("{:#}", error),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub source: String,
    pub output_dir: PathBuf,
    /// Phases before this one are taken from disk (1 = run everything)
    pub from_phase: u8,
    pub force: bool,
    pub dry_run: bool,
}

impl PipelineOptions {
    pub fn new(source: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            from_phase: 1,
            force: false,
            dry_run: false,
        }
    }

    fn resuming(&self) -> bool {
        self.from_phase > 1
    }
}

pub struct SkillCreator {
    options: PipelineOptions,
    config: Config,
    state: PipelineState,
}

impl SkillCreator {
    pub fn new(options: PipelineOptions, config: Config) -> Self {
        let state = PipelineState::fresh(&options.source);
        Self {
            options,
            config,
            state,
        }
    }

    pub fn extraction_dir(&self) -> PathBuf {
        self.options.output_dir.join("extraction")
    }

    pub fn corpus_file(&self) -> PathBuf {
        self.extraction_dir().join("corpus.json")
    }

    pub fn analysis_file(&self) -> PathBuf {
        self.options.output_dir.join("analysis.json")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.options.output_dir.join("templates")
    }

    pub fn state_file(&self) -> PathBuf {
        self.options.output_dir.join(STATE_FILE)
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Run every phase not already done. Stops at the first failing phase after
    /// recording it in the state file.
    pub fn run(&mut self) -> Result<&PipelineState> {
        if Phase::from_number(self.options.from_phase).is_none() {
            bail!(
                "Invalid --from-phase {} (expected 1-{})",
                self.options.from_phase,
                Phase::ALL.len()
            );
        }

        if self.options.resuming() {
            self.state = match self.load_state() {
                Some(state) => state,
                None => {
                    warn!("Resume requested but no state found, starting fresh");
                    PipelineState::fresh(&self.options.source)
                }
            };
        }

        self.prepare_output_dir()?;

        for phase in Phase::ALL {
            if !self.should_run(phase) {
                info!("Skipping Phase {}: {}", phase.number(), phase.as_str());
                continue;
            }

            info!("Phase {}: {}", phase.number(), phase.as_str());
            self.state.current_phase = Some(phase.number());
            self.save_state();

            match self.run_phase(phase) {
                Ok(output) => {
                    if !self.options.dry_run {
                        self.state.mark_phase_complete(phase, output.as_deref());
                    }
                    self.save_state();
                }
                Err(e) => {
                    self.state.record_error(phase, &e);
                    self.state.current_phase = None;
                    self.save_state();
                    return Err(e.context(format!("Pipeline failed at Phase {}", phase.number())));
                }
            }
        }

        self.state.current_phase = None;
        self.state.completed_at = Some(chrono::Utc::now().to_rfc3339());
        self.save_state();
        Ok(&self.state)
    }

    fn should_run(&self, phase: Phase) -> bool {
        !self.state.is_phase_complete(phase) && phase.number() >= self.options.from_phase
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let output = &self.options.output_dir;

        if output.exists() && !self.options.resuming() {
            if !self.options.force {
                bail!(
                    "Output directory '{}' already exists (use --force to overwrite)",
                    output.display()
                );
            }
            if self.options.dry_run {
                info!("Would overwrite output directory: {}", output.display());
                return Ok(());
            }
            fs::remove_dir_all(output)
                .with_context(|| format!("Failed to clear {}", output.display()))?;
        }

        if self.options.dry_run {
            info!("Would create output directory: {}", output.display());
            return Ok(());
        }

        fs::create_dir_all(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        info!("Created output directory: {}", output.display());
        Ok(())
    }

    fn run_phase(&self, phase: Phase) -> Result<Option<PathBuf>> {
        match phase {
            Phase::Extraction => self.run_extraction(),
            Phase::Analysis => self.run_analysis(),
            Phase::Templates => self.run_templates(),
        }
    }

    fn run_extraction(&self) -> Result<Option<PathBuf>> {
        if self.options.dry_run {
            info!("Would extract from: {}", self.options.source);
            info!("Would save to: {}", self.extraction_dir().display());
            return Ok(None);
        }

        let corpus = CorpusBuilder::from_source(&self.options.source)?;
        save_raw_docs(&corpus, &self.extraction_dir(), RawFormat::Markdown)?;
        save_raw_docs(&corpus, &self.extraction_dir(), RawFormat::Json)?;
        info!("Extracted {} page(s)", corpus.pages.len());
        Ok(Some(self.corpus_file()))
    }

    fn run_analysis(&self) -> Result<Option<PathBuf>> {
        if self.options.dry_run {
            info!("Would analyze: {}", self.corpus_file().display());
            info!("Would save to: {}", self.analysis_file().display());
            return Ok(None);
        }

        let corpus = load_corpus(&self.corpus_file())?;
        let context = DocAnalyzer::new(self.config.analysis.clone()).analyze(&corpus);
        save_analysis(&context, &self.analysis_file())?;
        info!("Analysis complete: {} tool", context.tool_type);
        Ok(Some(self.analysis_file()))
    }

    fn run_templates(&self) -> Result<Option<PathBuf>> {
        if self.options.dry_run {
            info!(
                "Would generate templates to: {}",
                self.templates_dir().display()
            );
            return Ok(None);
        }

        let context = load_analysis(&self.analysis_file())?;
        let templates = TemplateSynthesizer::new(self.config.synthesis.clone()).synthesize(&context);
        save_templates(&templates, &self.templates_dir())?;
        info!("Generated {} template(s)", templates.len());
        Ok(Some(self.templates_dir()))
    }

    fn load_state(&self) -> Option<PipelineState> {
        let path = self.state_file();
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<PipelineState>(&raw) {
            Ok(state) => {
                info!(
                    "Loaded state: {} phases complete",
                    state.completed_phases.len()
                );
                Some(state)
            }
            Err(e) => {
                warn!("Failed to load state from {}: {}", path.display(), e);
                None
            }
        }
    }

    /// State is best-effort bookkeeping; a failed write is logged, not fatal.
    fn save_state(&self) {
        if self.options.dry_run {
            return;
        }
        let path = self.state_file();
        let result = serde_json::to_string_pretty(&self.state)
            .map_err(anyhow::Error::from)
            .and_then(|body| fs::write(&path, body).map_err(anyhow::Error::from));
        if let Err(e) = result {
            warn!("Failed to save state to {}: {}", path.display(), e);
        }
    }
}
