use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skillsmith::cli;

#[derive(Parser)]
#[command(name = "skillsmith", version)]
#[command(about = "Analyze documentation and synthesize reusable templates", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ./skillsmith.toml or ~/.config/skillsmith/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract documentation into a corpus
    Extract {
        /// Markdown file, directory of markdown files, or URL
        source: String,

        /// Directory to save raw documentation
        #[arg(long, default_value = "raw_docs")]
        output_dir: String,

        /// Output format: markdown or json
        #[arg(long, default_value = "markdown")]
        format: String,
    },

    /// Analyze an extracted corpus
    Analyze {
        /// corpus.json file or directory containing one
        corpus: String,

        /// Write analysis JSON here instead of printing a summary
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Synthesize templates from an analysis file
    Synthesize {
        /// Analysis JSON produced by `analyze`
        analysis: String,

        /// Directory to save templates
        #[arg(long, default_value = "templates")]
        output_dir: String,

        /// Report validation results for each template
        #[arg(long)]
        validate: bool,
    },

    /// Run extraction, analysis and synthesis end to end
    Create {
        /// Markdown file, directory of markdown files, or URL
        source: String,

        /// Output directory for all phase outputs
        #[arg(long)]
        output_dir: String,

        /// Resume from this phase (1 = extraction, 2 = analysis, 3 = templates)
        #[arg(long, default_value_t = 1)]
        from_phase: u8,

        /// Overwrite an existing output directory
        #[arg(long)]
        force: bool,

        /// Log what each phase would do without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --quiet
    let default_level = if cli.quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract {
            source,
            output_dir,
            format,
        } => cli::extract::run(&source, &output_dir, &format)?,
        Commands::Analyze { corpus, output } => cli::analyze::run(&corpus, output, cli.config)?,
        Commands::Synthesize {
            analysis,
            output_dir,
            validate,
        } => cli::synthesize::run(&analysis, &output_dir, validate, cli.config)?,
        Commands::Create {
            source,
            output_dir,
            from_phase,
            force,
            dry_run,
        } => cli::create::run(
            &source,
            &output_dir,
            from_phase,
            force,
            dry_run,
            cli.config,
        )?,
    }

    Ok(())
}
