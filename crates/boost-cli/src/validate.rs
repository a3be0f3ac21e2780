//! # Validate Subcommand
//!
//! Validates a JSON payload file against an entity schema and prints the
//! result, either as a readable report or as the same JSON the HTTP
//! service returns.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boost_schema::{EntityValidator, SchemaRepository, ValidationResult};
use clap::Args;
use serde_json::Value;

/// Arguments for the `boost validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// PascalCase entity name, e.g. TraceableUnit.
    #[arg(value_name = "ENTITY")]
    pub entity: String,

    /// JSON file holding the payload to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the full result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `boost validate`.
///
/// Returns exit code 0 when the payload is schema-valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, schema_root: &Path, out: &mut impl Write) -> Result<u8> {
    let entity = crate::entity_arg(&args.entity)?;
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let data: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let validator = EntityValidator::new(SchemaRepository::new(schema_root));
    let result = validator.validate(entity.as_str(), &data);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &result)?;
        writeln!(out)?;
    } else {
        write_report(&args.entity, &result, out)?;
    }

    Ok(if result.valid { 0 } else { 1 })
}

fn write_report(entity: &str, result: &ValidationResult, out: &mut impl Write) -> Result<()> {
    let status = if result.valid { "PASS" } else { "FAIL" };
    writeln!(out, "{status}: {entity}: {}", result.message)?;
    for error in &result.errors {
        match &error.field {
            Some(field) => writeln!(out, "  [{}] {field}: {}", error.category, error.message)?,
            None => writeln!(out, "  [{}] {}", error.category, error.message)?,
        }
    }
    if !result.errors.is_empty() {
        let counts: Vec<String> = result
            .errors_by_type
            .iter()
            .map(|(category, errors)| format!("{category}={}", errors.len()))
            .collect();
        writeln!(out, "  by category: {}", counts.join(", "))?;
    }
    Ok(())
}
