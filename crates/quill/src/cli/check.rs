//! The `quill check` command for re-validating persisted artifacts.
//!
//! Two independent checks: structural validation against a JSON Schema
//! file, and completeness of expected section identifiers. Either can run
//! alone; a failing check makes the command exit nonzero.

use clap::Args;
use quill_core::{missing_sections, parse_document, ExitIntention};
use std::path::{Path, PathBuf};

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Artifact file to check
    pub artifact: PathBuf,

    /// JSON Schema file to validate the artifact against
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Expected section identifiers for a completeness re-check,
    /// comma separated
    #[arg(long, value_delimiter = ',')]
    pub expect: Vec<String>,
}

/// Execute the check command.
pub fn execute(args: CheckArgs) -> anyhow::Result<ExitIntention> {
    let raw = std::fs::read_to_string(&args.artifact)
        .map_err(|e| anyhow::anyhow!("Failed to read artifact {:?}: {e}", args.artifact))?;
    let instance: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Artifact is not valid JSON: {e}"))?;

    let mut failures = 0usize;

    if let Some(schema_path) = &args.schema {
        failures += check_schema(schema_path, &instance)?;
    }

    if !args.expect.is_empty() {
        failures += check_completeness(&raw, &args.expect);
    }

    if failures > 0 {
        println!("FAIL: {failures} check failure(s) in {:?}", args.artifact);
        Ok(ExitIntention::Fatal)
    } else {
        println!("OK: {:?}", args.artifact);
        Ok(ExitIntention::Success)
    }
}

/// Validate the artifact against a JSON Schema; returns the violation count.
fn check_schema(schema_path: &Path, instance: &serde_json::Value) -> anyhow::Result<usize> {
    let schema_raw = std::fs::read_to_string(schema_path)
        .map_err(|e| anyhow::anyhow!("Failed to read schema {schema_path:?}: {e}"))?;
    let schema_json: serde_json::Value = serde_json::from_str(&schema_raw)
        .map_err(|e| anyhow::anyhow!("Schema is not valid JSON: {e}"))?;

    let compiled = match jsonschema::JSONSchema::compile(&schema_json) {
        Ok(compiled) => compiled,
        Err(e) => anyhow::bail!("Failed to compile schema {schema_path:?}: {e}"),
    };

    let mut violations = 0usize;
    if let Err(errors) = compiled.validate(instance) {
        for error in errors {
            println!("schema violation at '{}': {error}", error.instance_path);
            violations += 1;
        }
    }
    if violations == 0 {
        println!("schema: valid");
    }
    Ok(violations)
}

/// Re-check expected sections against the artifact's section mapping;
/// returns the number of missing/incomplete ids.
fn check_completeness(raw: &str, expect: &[String]) -> usize {
    match parse_document(raw) {
        Ok(document) => {
            let missing = missing_sections(&document, expect);
            for id in &missing {
                println!("section {id}: missing or incomplete");
            }
            if missing.is_empty() {
                println!("sections: all {} expected section(s) complete", expect.len());
            }
            missing.len()
        }
        Err(e) => {
            println!("artifact lacks a section mapping: {e}");
            expect.len()
        }
    }
}
