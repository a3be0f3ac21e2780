//! # boost-cli — Command-Line Access to the Schema Repository
//!
//! Provides the `boost` binary, which runs the same operations as the HTTP
//! service directly against a schema repository on disk.
//!
//! ```bash
//! boost entities
//! boost validate TraceableUnit payload.json --json
//! boost dictionary TraceableUnit
//! ```
//!
//! Every subcommand handler writes to a caller-supplied writer and returns
//! the process exit code: 0 on success, 1 on validation failure.

pub mod dictionary;
pub mod entities;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use boost_core::EntityName;
use boost_schema::{resolve_schema_root, DEFAULT_ROOT_CANDIDATES};

/// Pick the schema root: the explicit path if given, else the first
/// existing default candidate.
pub fn schema_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(root) if root.is_dir() => Ok(root.to_path_buf()),
        Some(root) => bail!("schema root is not a directory: {}", root.display()),
        None => Ok(resolve_schema_root(DEFAULT_ROOT_CANDIDATES)?),
    }
}

/// Parse an entity name given on the command line.
pub(crate) fn entity_arg(name: &str) -> Result<EntityName> {
    Ok(EntityName::parse(name)?)
}
