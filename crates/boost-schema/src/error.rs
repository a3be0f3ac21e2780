//! # Repository Errors
//!
//! `NotFound` and `Parse` are the two failure classes callers care about:
//! the HTTP layer reports both as 404 on entity resource routes, and the
//! validation engine turns them into a failed [`ValidationResult`].
//!
//! [`ValidationResult`]: crate::ValidationResult

use std::path::PathBuf;

use boost_core::NameError;
use thiserror::Error;

/// Error while reading from the schema repository.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A required file or directory does not exist.
    #[error("{what} not found: {}", path.display())]
    NotFound {
        /// What was being looked up ("schema file", "dictionary file", ...).
        what: &'static str,
        /// Path that was probed.
        path: PathBuf,
    },

    /// A file exists but is not valid JSON.
    #[error("failed to parse '{}': {reason}", path.display())]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parser error message.
        reason: String,
    },

    /// A file or directory exists but could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// None of the candidate schema roots exist.
    #[error("no schema root found; tried: {}", display_paths(candidates))]
    NoSchemaRoot {
        /// Candidates probed, in order.
        candidates: Vec<PathBuf>,
    },

    /// The entity name is not acceptable.
    #[error("invalid entity name: {0}")]
    InvalidName(#[from] NameError),
}

impl SchemaError {
    /// Returns true if this error means "the thing does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidName(_))
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
