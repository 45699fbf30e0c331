//! Quill CLI - Resilient multi-section document generation.
//!
//! Quill calls a text-generation backend once (with retries for transient
//! failures), decodes the reply into named sections, and persists whatever
//! it got (full documents, incomplete documents, or salvaged fragments)
//! for downstream review.
//!
//! # Usage
//!
//! ```bash
//! # Generate a document from a prompt file
//! quill generate --prompt-file prompt.txt --expect 1-1,1-2,1-3 --output sections.json
//!
//! # Re-check a persisted artifact
//! quill check sections.json --schema schemas/sections.schema.json --expect 1-1,1-2
//!
//! # View configuration
//! quill config show
//! ```

use clap::{Parser, Subcommand};
use quill_core::ExitIntention;

mod cli;
mod logging;

/// Quill - Resilient multi-section document generation.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a section document from a prompt
    Generate(cli::generate::GenerateArgs),

    /// Check a persisted artifact against a schema and expected sections
    Check(cli::check::CheckArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match quill_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `quill config path`."
            );
            quill_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Quill v{}", quill_core::VERSION);

    // Dispatch to the appropriate command handler
    let intention = match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, config).await?,
        Commands::Check(args) => cli::check::execute(args)?,
        Commands::Config(args) => cli::config::execute(args)?,
    };

    // Only fatal outcomes raise the process-level failure signal; partial
    // results return normally so batch orchestrators can route them.
    if intention == ExitIntention::Fatal {
        std::process::exit(1);
    }
    Ok(())
}
