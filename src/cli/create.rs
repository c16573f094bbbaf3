use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::pipeline::{Phase, PipelineOptions, PipelineState, SkillCreator};

pub fn run(
    source: &str,
    output_dir: &str,
    from_phase: u8,
    force: bool,
    dry_run: bool,
    config_path: Option<String>,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;

    let mut options = PipelineOptions::new(source, output_dir);
    options.from_phase = from_phase;
    options.force = force;
    options.dry_run = dry_run;

    info!("Source: {}", source);
    info!("Output: {}", output_dir);
    info!("Dry run: {}", dry_run);

    let mut creator = SkillCreator::new(options, config);
    let result = creator.run().map(|_| ());
    print_summary(creator.state(), output_dir);
    result
}

fn print_summary(state: &PipelineState, output_dir: &str) {
    println!("{}", "=".repeat(60));
    println!("Skill Creation Summary");
    println!("{}", "=".repeat(60));
    println!("Output Directory: {}", output_dir);
    if let Some(started) = &state.started_at {
        println!("Started: {}", started);
    }
    if let Some(completed) = &state.completed_at {
        println!("Completed: {}", completed);
    }
    println!(
        "\nCompleted Phases: {}/{}",
        state.completed_phases.len(),
        Phase::ALL.len()
    );
    for phase in Phase::ALL {
        let mark = if state.is_phase_complete(phase) {
            "\u{2713}"
        } else {
            "-"
        };
        println!("  {} Phase {}: {}", mark, phase.number(), phase.as_str());
    }
    if !state.errors.is_empty() {
        println!("\nErrors: {}", state.errors.len());
        for error in &state.errors {
            println!("  \u{2717} Phase {}: {}", error.phase_number, error.error);
        }
    }
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("docs.md");
        fs::write(&doc, "# Tool\n\n```bash\nmytool --verbose run\n```\n").unwrap();
        let out = dir.path().join("skill");

        run(doc.to_str().unwrap(), out.to_str().unwrap(), 1, false, false, None).unwrap();
        assert!(out.join("analysis.json").exists());
        assert!(out.join("templates").is_dir());
    }

    #[test]
    fn test_run_refuses_existing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run("docs.md", dir.path().to_str().unwrap(), 1, false, false, None);
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }
}
