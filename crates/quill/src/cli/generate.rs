//! The `quill generate` command for running the generation pipeline.

use clap::Args;
use quill_core::{
    write_artifact, Config, ExitIntention, GenerateOptions, Generator, ProviderFactory,
};
use std::path::PathBuf;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// File containing the assembled prompt (reads stdin when omitted)
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// Expected section identifiers, comma separated (e.g. "1-1,1-2,1-3")
    #[arg(long, value_delimiter = ',', required = true)]
    pub expect: Vec<String>,

    /// Output file for the persisted artifact
    /// (defaults to <output.dir>/sections.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Backend provider ("anthropic", "openai", "ollama"); overrides config
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name (provider-specific); overrides config
    #[arg(long)]
    pub model: Option<String>,

    /// Max retry attempts after the initial call; overrides config
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Maximum output tokens; overrides config
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Wall-clock budget across all attempts, in milliseconds; overrides config
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

/// Execute the generate command.
///
/// Runs the pipeline, persists whatever payload the outcome carries, prints
/// the `{success, outputLocation, errorMessage}` envelope to stdout, and
/// returns the outcome's exit intention.
pub async fn execute(args: GenerateArgs, config: Config) -> anyhow::Result<ExitIntention> {
    let prompt = read_prompt(&args)?;
    if prompt.trim().is_empty() {
        anyhow::bail!("Prompt is empty");
    }

    let provider_name = args
        .provider
        .clone()
        .unwrap_or_else(|| config.llm.provider.clone());
    let provider = ProviderFactory::create(&provider_name, &config.llm, args.model.as_deref())?;

    let mut options = GenerateOptions::from_config(&config);
    if let Some(max_retries) = args.max_retries {
        options.max_retries = max_retries;
    }
    if let Some(max_tokens) = args.max_tokens {
        options.max_output_tokens = max_tokens;
    }
    if let Some(deadline_ms) = args.deadline_ms {
        options.deadline_ms = Some(deadline_ms);
    }

    let generator = Generator::new(provider, options);
    let outcome = generator.generate(&prompt, &args.expect).await;

    // Persist the payload (full document, partial document, or salvage)
    let output_location = match outcome.payload() {
        Some(body) => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| config.output_dir().join("sections.json"));
            write_artifact(&path, &body, config.output.pretty)?;
            tracing::info!("Artifact written to {:?}", path);
            Some(path)
        }
        None => None,
    };

    let signals = outcome.signals(output_location);
    println!("{}", serde_json::to_string_pretty(&signals)?);

    Ok(signals.exit)
}

/// Read the prompt from the given file, or stdin when none was given.
fn read_prompt(args: &GenerateArgs) -> anyhow::Result<String> {
    match &args.prompt_file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read prompt file {path:?}: {e}")),
        None => {
            tracing::debug!("No --prompt-file given; reading prompt from stdin");
            Ok(std::io::read_to_string(std::io::stdin())?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn generate_args_expect_list_is_comma_split() {
        let harness = Harness::parse_from(["quill", "--expect", "1-1,1-2,1-3"]);
        assert_eq!(harness.args.expect, vec!["1-1", "1-2", "1-3"]);
    }

    #[test]
    fn generate_args_defaults() {
        let harness = Harness::parse_from(["quill", "--expect", "1-1"]);
        assert!(harness.args.prompt_file.is_none());
        assert!(harness.args.output.is_none());
        assert!(harness.args.provider.is_none());
        assert!(harness.args.model.is_none());
        assert!(harness.args.max_retries.is_none());
        assert!(harness.args.deadline_ms.is_none());
    }

    #[test]
    fn generate_args_overrides_parse() {
        let harness = Harness::parse_from([
            "quill",
            "--expect",
            "2-1",
            "--provider",
            "ollama",
            "--max-retries",
            "5",
            "--max-tokens",
            "4000",
        ]);
        assert_eq!(harness.args.provider.as_deref(), Some("ollama"));
        assert_eq!(harness.args.max_retries, Some(5));
        assert_eq!(harness.args.max_tokens, Some(4000));
    }
}
