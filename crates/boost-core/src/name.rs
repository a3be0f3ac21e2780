//! # Entity Name Codec
//!
//! Bidirectional mapping between the PascalCase entity names used at the
//! API boundary and the snake_case directory names used on disk.
//!
//! ```text
//! TraceableUnit  --to_directory_name-->  traceable_unit
//! traceable_unit --to_entity_name----->  TraceableUnit
//! ```
//!
//! ## Known Limitation
//!
//! The two directions are not perfect inverses. Acronyms are split letter
//! by letter (`LCFSPathway` -> `l_c_f_s_pathway`), names containing `_` or
//! starting lowercase do not come back unchanged, and digits are kept as-is
//! without a separator. Names made of capitalized lowercase words always
//! round-trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// File stem reserved for the schema file inside each entity directory.
const RESERVED_STEM: &str = "validation_schema";

/// Convert a PascalCase entity name to its snake_case directory name.
///
/// Every uppercase character after the first is preceded by `_`; all
/// characters are lowercased.
pub fn to_directory_name(entity_name: &str) -> String {
    let mut out = String::with_capacity(entity_name.len() + 4);
    for (i, c) in entity_name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Convert a snake_case directory name back to a PascalCase entity name.
///
/// Splits on `_` and capitalizes each segment (first character uppercase,
/// remainder lowercase).
pub fn to_entity_name(dir_name: &str) -> String {
    dir_name.split('_').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Returns true if `name` is acceptable as an example file stem.
///
/// Example names come straight from URL path segments, so they are limited
/// to ASCII alphanumerics, `_` and `-`, and may not name the schema file.
pub fn is_valid_example_name(name: &str) -> bool {
    !name.is_empty()
        && name != RESERVED_STEM
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A validated, API-facing entity name such as `TraceableUnit`.
///
/// Only ASCII letters, digits and `_` are accepted, so a parsed name can be
/// joined onto the schema root without escaping it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Parse and validate an entity name.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Empty`] for an empty string and
    /// [`NameError::InvalidCharacter`] for anything outside `[A-Za-z0-9_]`.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if let Some((position, ch)) = name
            .chars()
            .enumerate()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(NameError::InvalidCharacter {
                name: name.to_string(),
                ch,
                position,
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Build the entity name for an on-disk directory.
    ///
    /// # Errors
    ///
    /// Fails if the directory name contains characters that cannot appear in
    /// an entity name.
    pub fn from_directory(dir_name: &str) -> Result<Self, NameError> {
        Self::parse(&to_entity_name(dir_name))
    }

    /// The name as given at the API boundary.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The snake_case directory name for this entity.
    pub fn directory_name(&self) -> String {
        to_directory_name(&self.0)
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> Self {
        name.0
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn directory_name_inserts_underscores() {
        assert_eq!(to_directory_name("TraceableUnit"), "traceable_unit");
        assert_eq!(to_directory_name("Organization"), "organization");
        assert_eq!(to_directory_name("MaterialProcessingEvent"), "material_processing_event");
    }

    #[test]
    fn directory_name_leading_uppercase_has_no_underscore() {
        assert!(!to_directory_name("Geographic").starts_with('_'));
    }

    #[test]
    fn consecutive_uppercase_letters_are_split() {
        assert_eq!(to_directory_name("LCFSPathway"), "l_c_f_s_pathway");
    }

    #[test]
    fn entity_name_capitalizes_segments() {
        assert_eq!(to_entity_name("traceable_unit"), "TraceableUnit");
        assert_eq!(to_entity_name("organization"), "Organization");
        assert_eq!(to_entity_name("BIOMASS_batch"), "BiomassBatch");
    }

    #[test]
    fn entity_name_skips_empty_segments() {
        assert_eq!(to_entity_name("a__b"), "AB");
        assert_eq!(to_entity_name(""), "");
    }

    #[test]
    fn parse_accepts_pascal_case() {
        let name = EntityName::parse("TraceableUnit").unwrap();
        assert_eq!(name.as_str(), "TraceableUnit");
        assert_eq!(name.directory_name(), "traceable_unit");
        assert_eq!(name.to_string(), "TraceableUnit");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(EntityName::parse(""), Err(NameError::Empty));
    }

    #[test]
    fn parse_rejects_path_traversal() {
        let err = EntityName::parse("..").unwrap_err();
        assert!(matches!(err, NameError::InvalidCharacter { ch: '.', position: 0, .. }));
        assert!(EntityName::parse("Traceable/Unit").is_err());
        assert!(EntityName::parse("Traceable Unit").is_err());
    }

    #[test]
    fn from_directory_maps_back() {
        let name = EntityName::from_directory("supply_base").unwrap();
        assert_eq!(name.as_str(), "SupplyBase");
    }

    #[test]
    fn serde_uses_plain_string() {
        let name: EntityName = serde_json::from_str("\"Organization\"").unwrap();
        assert_eq!(name.as_str(), "Organization");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Organization\"");
        assert!(serde_json::from_str::<EntityName>("\"../etc\"").is_err());
    }

    #[test]
    fn example_names() {
        assert!(is_valid_example_name("traceable_unit_example"));
        assert!(is_valid_example_name("carb-minimal"));
        assert!(!is_valid_example_name(""));
        assert!(!is_valid_example_name("validation_schema"));
        assert!(!is_valid_example_name("../secret"));
        assert!(!is_valid_example_name("a.json"));
    }

    fn pascal_case_name() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,8}", 1..5)
            .prop_map(|words| words.iter().map(|w| capitalize(w)).collect())
    }

    proptest! {
        /// Names built from capitalized lowercase words survive the round trip.
        #[test]
        fn codec_round_trips(name in pascal_case_name()) {
            let dir = to_directory_name(&name);
            prop_assert_eq!(to_entity_name(&dir), name);
        }

        /// Directory names never contain uppercase letters.
        #[test]
        fn directory_names_are_lowercase(name in pascal_case_name()) {
            let dir = to_directory_name(&name);
            prop_assert!(!dir.chars().any(|c| c.is_uppercase()));
        }

        /// Every generated name passes validation.
        #[test]
        fn generated_names_parse(name in pascal_case_name()) {
            prop_assert!(EntityName::parse(&name).is_ok());
        }
    }
}
