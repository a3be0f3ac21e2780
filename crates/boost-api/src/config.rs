//! # Service Configuration
//!
//! Resolved once at startup from the environment:
//!
//! | variable            | meaning                                   | default |
//! |---------------------|-------------------------------------------|---------|
//! | `BOOST_PORT`        | TCP port to listen on                     | `5000`  |
//! | `BOOST_SCHEMA_ROOT` | schema repository root; must exist if set | first existing of [`DEFAULT_ROOT_CANDIDATES`] |
//!
//! Logging is configured separately through `RUST_LOG` and
//! `BOOST_LOG_FORMAT` (see the binary entry point).

use std::path::{Path, PathBuf};

use boost_schema::{resolve_schema_root, SchemaError, DEFAULT_ROOT_CANDIDATES};
use thiserror::Error;

/// Port used when `BOOST_PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variable overriding the listen port.
pub const PORT_VAR: &str = "BOOST_PORT";

/// Environment variable overriding the schema root.
pub const SCHEMA_ROOT_VAR: &str = "BOOST_SCHEMA_ROOT";

/// Startup configuration failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `BOOST_SCHEMA_ROOT` names a path that is not a directory.
    #[error("BOOST_SCHEMA_ROOT does not name a directory: {}", .0.display())]
    SchemaRootMissing(PathBuf),

    /// No candidate schema root exists.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Root directory of the schema repository.
    pub schema_root: PathBuf,
}

impl AppConfig {
    /// Configuration for `schema_root` on the default port.
    pub fn new(schema_root: impl Into<PathBuf>) -> Self {
        Self {
            port: DEFAULT_PORT,
            schema_root: schema_root.into(),
        }
    }

    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `BOOST_SCHEMA_ROOT` is set to a missing directory, or if it
    /// is unset and none of the default candidates exist.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok(), DEFAULT_ROOT_CANDIDATES)
    }

    /// Build the configuration from an arbitrary variable lookup and
    /// candidate list.
    pub fn resolve<P: AsRef<Path>>(
        lookup: impl Fn(&str) -> Option<String>,
        candidates: &[P],
    ) -> Result<Self, ConfigError> {
        let port = match lookup(PORT_VAR) {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, default = DEFAULT_PORT, "ignoring unparsable BOOST_PORT");
                DEFAULT_PORT
            }),
        };

        let schema_root = match lookup(SCHEMA_ROOT_VAR).filter(|v| !v.is_empty()) {
            Some(root) => {
                let root = PathBuf::from(root);
                if !root.is_dir() {
                    return Err(ConfigError::SchemaRootMissing(root));
                }
                root
            }
            None => resolve_schema_root(candidates)?,
        };

        Ok(Self { port, schema_root })
    }
}
