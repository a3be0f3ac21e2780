//! # Error Types
//!
//! Errors raised while validating names that arrive from untrusted input
//! (HTTP path parameters, CLI arguments) before they are turned into
//! filesystem paths.

use thiserror::Error;

/// An entity or example name was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name was empty.
    #[error("name must not be empty")]
    Empty,

    /// The name contained a character outside the accepted alphabet.
    #[error("invalid character {ch:?} at position {position} in name '{name}'")]
    InvalidCharacter {
        /// The rejected name.
        name: String,
        /// The offending character.
        ch: char,
        /// Character index of the offending character.
        position: usize,
    },
}
