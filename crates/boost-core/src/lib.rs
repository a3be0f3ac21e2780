//! # boost-core — Foundational Types for the BOOST Schema Service
//!
//! Leaf crate of the workspace. Defines the entity-name codec that maps
//! API-facing PascalCase entity names (`TraceableUnit`) onto the snake_case
//! directory names used in the schema repository (`traceable_unit`), and the
//! validated newtypes that keep untrusted path parameters out of filesystem
//! paths.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `boost-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod name;

pub use error::NameError;
pub use name::{is_valid_example_name, to_directory_name, to_entity_name, EntityName};
