//! # boost-schema — Schema Repository, Dictionaries & Validation
//!
//! Everything the BOOST service knows about entities lives in a schema
//! repository on disk: one directory per entity, holding a
//! `validation_schema.json`, optional example payloads, and an optional
//! markdown field dictionary.
//!
//! ## Modules
//!
//! - [`repository`] — locates the repository root and loads schemas,
//!   examples and dictionary sources. Files are re-read on every call.
//! - [`dictionary`] — line-oriented parser for the overview paragraph and
//!   HTML field table of an entity dictionary.
//! - [`validate`] — runs the `jsonschema` validator in collect-all mode and
//!   turns each violation into a categorized [`ErrorDescriptor`].
//! - [`rules`] — placeholder business-rule pass (required-field re-check).
//!
//! ## Crate Policy
//!
//! - Depends only on `boost-core` internally.
//! - Validation never returns `Err`; every failure is reported inside a
//!   [`ValidationResult`].

pub mod dictionary;
pub mod error;
pub mod labels;
pub mod repository;
pub mod rules;
pub mod validate;

pub use dictionary::{Dictionary, DictionaryIssue, FieldDefinition, FieldTable};
pub use error::SchemaError;
pub use repository::{
    resolve_schema_root, ExampleRecord, SchemaDocument, SchemaRepository,
    DEFAULT_ROOT_CANDIDATES, SCHEMA_FILE,
};
pub use rules::{BusinessRuleOutcome, DISCLAIMER};
pub use validate::{
    validate_document, EntityValidator, ErrorCategory, ErrorDescriptor, ValidationResult,
};
