//! # Entities Subcommand
//!
//! Prints the entity catalog, one name per line.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use boost_schema::SchemaRepository;

/// Execute `boost entities`.
pub fn run_entities(schema_root: &Path, out: &mut impl Write) -> Result<u8> {
    let repository = SchemaRepository::new(schema_root);
    let entities = repository
        .list_entities()
        .context("failed to list entities")?;
    tracing::debug!(count = entities.len(), "listed entities");
    for entity in entities {
        writeln!(out, "{entity}")?;
    }
    Ok(0)
}
