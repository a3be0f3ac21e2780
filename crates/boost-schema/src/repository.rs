//! # Schema Repository Accessor
//!
//! Read-only access to the on-disk schema repository:
//!
//! ```text
//! <root>/
//!   traceable_unit/
//!     validation_schema.json          (required)
//!     traceable_unit_example.json     (default example, optional)
//!     traceable_unit_carb_minimal.json
//!     traceable_unit_dictionary.md    (optional)
//!   organization/
//!     ...
//! ```
//!
//! Nothing is cached. Every call re-reads the files it needs, so edits to
//! the repository are visible on the next request.

use std::path::{Path, PathBuf};

use boost_core::{is_valid_example_name, EntityName};
use serde::Serialize;
use serde_json::Value;

use crate::dictionary::{self, Dictionary};
use crate::error::SchemaError;
use crate::labels;

/// Name of the schema file inside each entity directory.
pub const SCHEMA_FILE: &str = "validation_schema.json";

/// Schema root candidates probed at startup, in priority order.
///
/// `/app/schema` is the mount point inside the container image; the
/// relative paths cover running from a source checkout.
pub const DEFAULT_ROOT_CANDIDATES: &[&str] = &["/app/schema", "../schema", "./schema"];

/// Return the first candidate that exists as a directory.
///
/// # Errors
///
/// Returns [`SchemaError::NoSchemaRoot`] if no candidate exists.
pub fn resolve_schema_root<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, SchemaError> {
    candidates
        .iter()
        .map(|c| c.as_ref())
        .find(|c| c.is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| SchemaError::NoSchemaRoot {
            candidates: candidates.iter().map(|c| c.as_ref().to_path_buf()).collect(),
        })
}

/// A `validation_schema.json` file, split into its schema and rule parts.
///
/// The file is either a bare JSON Schema or an envelope of the form
/// `{"schema": {...}, "rules": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// The JSON Schema to validate against.
    pub schema: Value,
    /// Top-level `rules` value of the file, if any.
    pub rules: Option<Value>,
}

impl SchemaDocument {
    /// Split a raw schema file into schema and rules.
    pub fn from_value(raw: Value) -> Self {
        let rules = raw.get("rules").cloned();
        let schema = match raw {
            Value::Object(mut map) if map.contains_key("schema") => {
                map.remove("schema").unwrap_or(Value::Null)
            }
            other => other,
        };
        Self { schema, rules }
    }

    /// Returns true if the file declares a non-empty `rules` section.
    pub fn has_rules(&self) -> bool {
        match &self.rules {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Object(m)) => !m.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(Value::Bool(true)) => true,
        }
    }
}

/// One example payload of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleRecord {
    /// Display label, e.g. "Standard Example".
    pub name: String,
    /// File name inside the entity directory.
    pub filename: String,
    /// Parsed JSON content.
    pub data: Value,
}

/// Read-only accessor for a schema repository rooted at a directory.
#[derive(Debug, Clone)]
pub struct SchemaRepository {
    root: PathBuf,
}

impl SchemaRepository {
    /// Create an accessor for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of `entity`.
    pub fn entity_dir(&self, entity: &EntityName) -> PathBuf {
        self.root.join(entity.directory_name())
    }

    /// List every entity whose directory contains a schema file, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the root cannot be read.
    pub fn list_entities(&self) -> Result<Vec<EntityName>, SchemaError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| SchemaError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut entities = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || !path.join(SCHEMA_FILE).is_file() {
                continue;
            }
            let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match EntityName::from_directory(dir_name) {
                Ok(name) => entities.push(name),
                Err(e) => {
                    tracing::warn!(dir = dir_name, error = %e, "skipping entity directory");
                }
            }
        }
        entities.sort();
        entities.dedup();
        Ok(entities)
    }

    /// Load the raw schema file of `entity`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] if the schema file is absent,
    /// [`SchemaError::Parse`] if it is not valid JSON.
    pub fn load_schema_document(&self, entity: &EntityName) -> Result<SchemaDocument, SchemaError> {
        let path = self.entity_dir(entity).join(SCHEMA_FILE);
        read_json(&path, "schema file").map(SchemaDocument::from_value)
    }

    /// Load the JSON Schema of `entity`, unwrapped from its envelope.
    ///
    /// # Errors
    ///
    /// Same as [`load_schema_document`](Self::load_schema_document).
    pub fn load_schema(&self, entity: &EntityName) -> Result<Value, SchemaError> {
        self.load_schema_document(entity).map(|doc| doc.schema)
    }

    /// List all example payloads of `entity`, sorted by file name.
    ///
    /// Every `*.json` file except the schema file counts as an example.
    /// Files that fail to parse are skipped.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] if the entity directory does not exist.
    pub fn list_examples(&self, entity: &EntityName) -> Result<Vec<ExampleRecord>, SchemaError> {
        let dir = self.entity_dir(entity);
        if !dir.is_dir() {
            return Err(SchemaError::NotFound {
                what: "entity directory",
                path: dir,
            });
        }
        let dir_name = entity.directory_name();

        let entries = std::fs::read_dir(&dir).map_err(|source| SchemaError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter(|p| p.file_name().is_some_and(|n| n != SCHEMA_FILE))
            .collect();
        files.sort();

        let mut examples = Vec::with_capacity(files.len());
        for path in files {
            let (Some(filename), Some(stem)) = (
                path.file_name().and_then(|n| n.to_str()),
                path.file_stem().and_then(|n| n.to_str()),
            ) else {
                continue;
            };
            match read_json(&path, "example file") {
                Ok(data) => examples.push(ExampleRecord {
                    name: labels::display_label(&dir_name, stem),
                    filename: filename.to_string(),
                    data,
                }),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable example"),
            }
        }
        Ok(examples)
    }

    /// Load one example of `entity`.
    ///
    /// Looks for `<example_name>.json` when a name is given, then for the
    /// default `<dir>_example.json`. Returns an empty object when neither
    /// exists.
    ///
    /// # Errors
    ///
    /// Only fails when a file exists but cannot be read or parsed.
    pub fn load_example(
        &self,
        entity: &EntityName,
        example_name: Option<&str>,
    ) -> Result<Value, SchemaError> {
        let dir = self.entity_dir(entity);
        let dir_name = entity.directory_name();

        let named = example_name
            .filter(|n| is_valid_example_name(n))
            .map(|n| dir.join(format!("{n}.json")));
        let default = dir.join(format!("{dir_name}_example.json"));

        for path in named.into_iter().chain(std::iter::once(default)) {
            if path.is_file() {
                return read_json(&path, "example file");
            }
        }
        Ok(Value::Object(serde_json::Map::new()))
    }

    /// Read the raw markdown dictionary of `entity`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotFound`] if `<dir>_dictionary.md` is absent.
    pub fn load_dictionary_source(&self, entity: &EntityName) -> Result<String, SchemaError> {
        let dir_name = entity.directory_name();
        let path = self
            .entity_dir(entity)
            .join(format!("{dir_name}_dictionary.md"));
        if !path.is_file() {
            return Err(SchemaError::NotFound {
                what: "dictionary file",
                path,
            });
        }
        tracing::debug!(path = %path.display(), "reading dictionary");
        std::fs::read_to_string(&path).map_err(|source| SchemaError::Io { path, source })
    }

    /// Read and parse the dictionary of `entity`.
    ///
    /// # Errors
    ///
    /// Any error of [`load_dictionary_source`](Self::load_dictionary_source).
    /// Grammar problems are recovered from and listed in
    /// [`Dictionary::issues`].
    pub fn load_dictionary(&self, entity: &EntityName) -> Result<Dictionary, SchemaError> {
        let source = self.load_dictionary_source(entity)?;
        Ok(dictionary::parse(&source))
    }
}

fn read_json(path: &Path, what: &'static str) -> Result<Value, SchemaError> {
    if !path.is_file() {
        return Err(SchemaError::NotFound {
            what,
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), "reading {what}");
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| SchemaError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
