//! Business-rule pass.
//!
//! Runs only after schema validation succeeded and only when the schema
//! file declares a non-empty `rules` section. The rule engine itself is
//! not implemented yet: the pass re-checks the schema's top-level
//! `required` list for null or empty-string values and appends a notice
//! that the full rule set is disabled. Its output is advisory and never
//! makes a schema-valid payload invalid.

use serde_json::Value;

use crate::repository::SchemaDocument;
use crate::validate::{ErrorCategory, ErrorDescriptor};

/// Notice appended to every rule pass that runs.
pub const DISCLAIMER: &str = "Note: Advanced business rule validation temporarily disabled";

/// Result of the business-rule pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRuleOutcome {
    /// False if any required field was missing or empty.
    pub valid: bool,
    /// Warnings, each in the `business_rule` category.
    pub warnings: Vec<ErrorDescriptor>,
}

impl BusinessRuleOutcome {
    fn passed() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
        }
    }
}

/// Run the business-rule pass for `data`.
pub fn check(document: &SchemaDocument, data: &Value) -> BusinessRuleOutcome {
    if !document.has_rules() {
        return BusinessRuleOutcome::passed();
    }

    let required = document
        .schema
        .get("required")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut warnings: Vec<ErrorDescriptor> = required
        .iter()
        .filter_map(Value::as_str)
        .filter(|field| is_blank(data.get(*field)))
        .map(|field| {
            ErrorDescriptor::new(
                ErrorCategory::BusinessRule,
                Some(field.to_string()),
                format!("Required field '{field}' is missing or empty"),
            )
        })
        .collect();

    let valid = warnings.is_empty();
    if !valid {
        tracing::debug!(count = warnings.len(), "business rule warnings");
    }
    warnings.push(ErrorDescriptor::new(
        ErrorCategory::BusinessRule,
        None,
        DISCLAIMER,
    ));
    BusinessRuleOutcome { valid, warnings }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
