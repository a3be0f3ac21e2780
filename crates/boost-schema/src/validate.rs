//! # Entity Validation
//!
//! Validates candidate payloads against an entity's JSON Schema and
//! reports every violation, not just the first.
//!
//! ## Error Taxonomy
//!
//! Each violation reported by `jsonschema` is classified by the keyword
//! that failed:
//!
//! | category     | keyword(s)                                   |
//! |--------------|----------------------------------------------|
//! | `required`   | `required`                                   |
//! | `type`       | `type`                                       |
//! | `enum`       | `enum`                                       |
//! | `pattern`    | `pattern`                                    |
//! | `constraint` | `minLength`, `maxLength`, `minimum`, `maximum` |
//! | `format`     | `format`                                     |
//! | `other`      | anything else                                |
//!
//! Two further categories never come from the validator: `schema` (the
//! schema could not be loaded or compiled) and `business_rule` (advisory
//! output of [`crate::rules`]).
//!
//! Field paths are dotted (`harvest.location.0.lat`); the instance root is
//! `null` in descriptors and `root` in messages.

use std::collections::BTreeMap;
use std::fmt;

use boost_core::EntityName;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::repository::{SchemaDocument, SchemaRepository};
use crate::rules;

/// Token used in messages for the instance root.
const ROOT: &str = "root";

/// Category of a reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A required property is missing.
    Required,
    /// A value has the wrong JSON type.
    Type,
    /// A value is not in the allowed set.
    Enum,
    /// A string does not match a regular expression.
    Pattern,
    /// A length or numeric bound is violated.
    Constraint,
    /// A named format check failed.
    Format,
    /// Any other schema keyword failed.
    Other,
    /// The schema itself could not be loaded or compiled.
    Schema,
    /// Advisory business-rule output.
    BusinessRule,
}

impl ErrorCategory {
    /// Snake-case tag, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Pattern => "pattern",
            Self::Constraint => "constraint",
            Self::Format => "format",
            Self::Other => "other",
            Self::Schema => "schema",
            Self::BusinessRule => "business_rule",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-facing error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Category tag.
    #[serde(rename = "type")]
    pub category: ErrorCategory,
    /// Dotted path of the offending field, `None` for the instance root.
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Expected type or format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Allowed values of an `enum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    /// Regular expression that was not matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Name of the violated bound keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    /// Value of the violated bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
    /// The offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
}

impl ErrorDescriptor {
    /// Create a descriptor with no category-specific details.
    pub fn new(category: ErrorCategory, field: Option<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            field,
            message: message.into(),
            expected: None,
            allowed_values: None,
            pattern: None,
            constraint: None,
            limit: None,
            actual_value: None,
        }
    }

    fn with_actual(mut self, value: &Value) -> Self {
        self.actual_value = Some(value.clone());
        self
    }

    /// Classify and render one `jsonschema` violation.
    pub fn from_violation(error: &ValidationError<'_>) -> Self {
        let path = dotted_path(&error.instance_path.to_string());
        let label = path.as_deref().unwrap_or(ROOT).to_string();
        let instance: &Value = &error.instance;

        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let property = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                let (field, message) = match &path {
                    Some(parent) => (
                        format!("{parent}.{property}"),
                        format!("Missing required field: '{property}' in {parent}"),
                    ),
                    None => (
                        property.clone(),
                        format!("Missing required field: '{property}'"),
                    ),
                };
                Self::new(ErrorCategory::Required, Some(field), message)
            }
            ValidationErrorKind::Type { kind } => {
                let expected = type_names(kind);
                let mut d = Self::new(
                    ErrorCategory::Type,
                    path,
                    format!("Field '{label}': expected type {expected}"),
                );
                d.expected = Some(expected);
                d.with_actual(instance)
            }
            ValidationErrorKind::Enum { options } => {
                let allowed = match options {
                    Value::Array(values) => values.clone(),
                    other => vec![other.clone()],
                };
                let listed = allowed.iter().map(quote).collect::<Vec<_>>().join(", ");
                let mut d = Self::new(
                    ErrorCategory::Enum,
                    path,
                    format!("Field '{label}': value must be one of: {listed}"),
                );
                d.allowed_values = Some(allowed);
                d.with_actual(instance)
            }
            ValidationErrorKind::Pattern { pattern } => {
                let mut d = Self::new(
                    ErrorCategory::Pattern,
                    path,
                    format!("Field '{label}': value does not match required pattern '{pattern}'"),
                );
                d.pattern = Some(pattern.clone());
                d.with_actual(instance)
            }
            ValidationErrorKind::MinLength { limit } => constraint(
                path,
                "minLength",
                Value::from(*limit),
                format!("Field '{label}': must be at least {limit} characters long"),
            )
            .with_actual(instance),
            ValidationErrorKind::MaxLength { limit } => constraint(
                path,
                "maxLength",
                Value::from(*limit),
                format!("Field '{label}': must be at most {limit} characters long"),
            )
            .with_actual(instance),
            ValidationErrorKind::Minimum { limit } => constraint(
                path,
                "minimum",
                limit.clone(),
                format!("Field '{label}': must be greater than or equal to {limit}"),
            )
            .with_actual(instance),
            ValidationErrorKind::Maximum { limit } => constraint(
                path,
                "maximum",
                limit.clone(),
                format!("Field '{label}': must be less than or equal to {limit}"),
            )
            .with_actual(instance),
            ValidationErrorKind::Format { format } => {
                let mut d = Self::new(
                    ErrorCategory::Format,
                    path,
                    format!("Field '{label}': must be a valid {format}"),
                );
                d.expected = Some(format.clone());
                d.with_actual(instance)
            }
            _ => {
                let rendered = error.to_string();
                let first_line = rendered.lines().next().unwrap_or_default();
                let message = match &path {
                    Some(p) => format!("Field '{p}': {first_line}"),
                    None => first_line.to_string(),
                };
                Self::new(ErrorCategory::Other, path, message).with_actual(instance)
            }
        }
    }
}

fn constraint(field: Option<String>, keyword: &str, limit: Value, message: String) -> ErrorDescriptor {
    let mut d = ErrorDescriptor::new(ErrorCategory::Constraint, field, message);
    d.constraint = Some(keyword.to_string());
    d.limit = Some(limit);
    d
}

fn type_names(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(ty) => ty.to_string(),
        TypeKind::Multiple(types) => types
            .into_iter()
            .map(|ty| ty.to_string())
            .collect::<Vec<_>>()
            .join(" or "),
    }
}

fn quote(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => format!("'{other}'"),
    }
}

/// Convert a JSON Pointer (`/a/0/b`) to a dotted path (`a.0.b`).
///
/// Returns `None` for the root pointer.
fn dotted_path(pointer: &str) -> Option<String> {
    if pointer.is_empty() || pointer == "/" {
        return None;
    }
    Some(
        pointer
            .split('/')
            .skip(1)
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Outcome of validating one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when the payload conforms to the schema.
    pub valid: bool,
    /// True when no schema violation was found.
    pub schema_valid: bool,
    /// False when the business-rule pass reported a missing field.
    pub business_rules_valid: bool,
    /// All errors and warnings, in validator order.
    pub errors: Vec<ErrorDescriptor>,
    /// The same errors grouped by category.
    pub errors_by_type: BTreeMap<ErrorCategory, Vec<ErrorDescriptor>>,
    /// Summary message.
    pub message: String,
}

impl ValidationResult {
    fn failed(errors: Vec<ErrorDescriptor>, message: &str) -> Self {
        Self {
            valid: false,
            schema_valid: false,
            business_rules_valid: false,
            errors_by_type: group_by_category(&errors),
            errors,
            message: message.to_string(),
        }
    }

    fn schema_unavailable(err: &SchemaError) -> Self {
        let (message, detail) = match err {
            SchemaError::Parse { .. } => ("Schema could not be parsed", format!("Schema error: {err}")),
            _ => ("Schema file not found", format!("Schema not found: {err}")),
        };
        Self::failed(
            vec![ErrorDescriptor::new(ErrorCategory::Schema, None, detail)],
            message,
        )
    }

    /// Result for a validation run that failed unexpectedly.
    pub fn validation_error(reason: &str) -> Self {
        Self::failed(
            vec![ErrorDescriptor::new(
                ErrorCategory::Schema,
                None,
                format!("Validation error: {reason}"),
            )],
            "Validation error",
        )
    }

    fn passed(outcome: rules::BusinessRuleOutcome) -> Self {
        let message = if outcome.valid {
            "Validation successful"
        } else {
            "Schema valid but business rules failed"
        };
        Self {
            valid: true,
            schema_valid: true,
            business_rules_valid: outcome.valid,
            errors_by_type: group_by_category(&outcome.warnings),
            errors: outcome.warnings,
            message: message.to_string(),
        }
    }

    /// Short outcome label: `valid`, `business_rules_failed`,
    /// `schema_invalid` or `error`.
    pub fn outcome(&self) -> &'static str {
        if self.valid && self.business_rules_valid {
            "valid"
        } else if self.valid {
            "business_rules_failed"
        } else if self.errors.iter().any(|e| e.category == ErrorCategory::Schema) {
            "error"
        } else {
            "schema_invalid"
        }
    }
}

fn group_by_category(errors: &[ErrorDescriptor]) -> BTreeMap<ErrorCategory, Vec<ErrorDescriptor>> {
    let mut grouped: BTreeMap<ErrorCategory, Vec<ErrorDescriptor>> = BTreeMap::new();
    for error in errors {
        grouped.entry(error.category).or_default().push(error.clone());
    }
    grouped
}

fn build_validator(schema: &Value) -> Result<Validator, String> {
    let mut opts = jsonschema::options();
    opts.should_validate_formats(true);
    opts.build(schema).map_err(|e| e.to_string())
}

/// Validate `data` against an already-loaded schema document.
pub fn validate_document(document: &SchemaDocument, data: &Value) -> ValidationResult {
    let validator = match build_validator(&document.schema) {
        Ok(v) => v,
        Err(reason) => return ValidationResult::validation_error(&reason),
    };

    let errors: Vec<ErrorDescriptor> = validator
        .iter_errors(data)
        .map(|e| ErrorDescriptor::from_violation(&e))
        .collect();
    if !errors.is_empty() {
        return ValidationResult::failed(errors, "Schema validation failed");
    }

    ValidationResult::passed(rules::check(document, data))
}

/// Validates payloads against the schemas of a [`SchemaRepository`].
///
/// The schema is re-read from disk on every call.
#[derive(Debug, Clone)]
pub struct EntityValidator {
    repository: SchemaRepository,
}

impl EntityValidator {
    /// Create a validator over `repository`.
    pub fn new(repository: SchemaRepository) -> Self {
        Self { repository }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &SchemaRepository {
        &self.repository
    }

    /// Validate `data` against the schema of `entity_name`.
    ///
    /// Never fails: a missing or malformed schema, or a schema the
    /// validator cannot compile, yields `valid: false` with a `schema`
    /// error.
    pub fn validate(&self, entity_name: &str, data: &Value) -> ValidationResult {
        let document = EntityName::parse(entity_name)
            .map_err(SchemaError::from)
            .and_then(|entity| self.repository.load_schema_document(&entity));
        let result = match document {
            Ok(document) => validate_document(&document, data),
            Err(err) => ValidationResult::schema_unavailable(&err),
        };
        tracing::info!(
            entity = entity_name,
            outcome = result.outcome(),
            errors = result.errors.len(),
            "validated payload"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SCHEMA_FILE;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(schema: Value) -> SchemaDocument {
        SchemaDocument::from_value(schema)
    }

    fn categories(result: &ValidationResult) -> Vec<ErrorCategory> {
        result.errors.iter().map(|e| e.category).collect()
    }

    #[test]
    fn single_missing_required_field() {
        let schema = doc(json!({"type": "object", "required": ["a", "b"]}));
        let result = validate_document(&schema, &json!({"a": 1}));
        assert!(!result.valid);
        assert!(!result.schema_valid);
        assert!(!result.business_rules_valid);
        assert_eq!(result.message, "Schema validation failed");
        assert_eq!(result.errors.len(), 1);
        let err = &result.errors[0];
        assert_eq!(err.category, ErrorCategory::Required);
        assert_eq!(err.field.as_deref(), Some("b"));
        assert_eq!(err.message, "Missing required field: 'b'");
    }

    #[test]
    fn every_missing_required_field_is_reported() {
        let schema = doc(json!({"type": "object", "required": ["a", "b"]}));
        let result = validate_document(&schema, &json!({}));
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors_by_type[&ErrorCategory::Required].len(), 2);
        let mut fields: Vec<_> = result
            .errors
            .iter()
            .filter_map(|e| e.field.clone())
            .collect();
        fields.sort();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn nested_required_mentions_parent() {
        let schema = doc(json!({
            "type": "object",
            "properties": {
                "location": {"type": "object", "required": ["lat"]}
            }
        }));
        let result = validate_document(&schema, &json!({"location": {}}));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field.as_deref(), Some("location.lat"));
        assert_eq!(
            result.errors[0].message,
            "Missing required field: 'lat' in location"
        );
    }

    #[test]
    fn type_and_enum_on_different_fields() {
        let schema = doc(json!({
            "type": "object",
            "properties": {
                "volume": {"type": "number"},
                "status": {"enum": ["active", "retired"]}
            }
        }));
        let result = validate_document(&schema, &json!({"volume": "lots", "status": "lost"}));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);

        let type_errors = &result.errors_by_type[&ErrorCategory::Type];
        assert_eq!(type_errors.len(), 1);
        assert_eq!(type_errors[0].field.as_deref(), Some("volume"));
        assert_eq!(type_errors[0].message, "Field 'volume': expected type number");
        assert_eq!(type_errors[0].expected.as_deref(), Some("number"));
        assert_eq!(type_errors[0].actual_value, Some(json!("lots")));

        let enum_errors = &result.errors_by_type[&ErrorCategory::Enum];
        assert_eq!(enum_errors.len(), 1);
        assert_eq!(
            enum_errors[0].message,
            "Field 'status': value must be one of: 'active', 'retired'"
        );
        assert_eq!(
            enum_errors[0].allowed_values,
            Some(vec![json!("active"), json!("retired")])
        );
    }

    #[test]
    fn pattern_violation() {
        let schema = doc(json!({
            "properties": {"id": {"type": "string", "pattern": "^TU-[0-9]+$"}}
        }));
        let result = validate_document(&schema, &json!({"id": "X"}));
        assert_eq!(categories(&result), vec![ErrorCategory::Pattern]);
        assert_eq!(
            result.errors[0].message,
            "Field 'id': value does not match required pattern '^TU-[0-9]+$'"
        );
        assert_eq!(result.errors[0].pattern.as_deref(), Some("^TU-[0-9]+$"));
    }

    #[test]
    fn length_and_range_constraints() {
        let schema = doc(json!({
            "properties": {
                "code": {"type": "string", "minLength": 3, "maxLength": 5},
                "volume": {"type": "number", "minimum": 0, "maximum": 100}
            }
        }));

        let short = validate_document(&schema, &json!({"code": "ab"}));
        assert_eq!(short.errors[0].message, "Field 'code': must be at least 3 characters long");
        assert_eq!(short.errors[0].constraint.as_deref(), Some("minLength"));
        assert_eq!(short.errors[0].limit, Some(json!(3)));

        let long = validate_document(&schema, &json!({"code": "abcdef"}));
        assert_eq!(long.errors[0].message, "Field 'code': must be at most 5 characters long");

        let low = validate_document(&schema, &json!({"volume": -1}));
        assert_eq!(low.errors[0].category, ErrorCategory::Constraint);
        assert_eq!(
            low.errors[0].message,
            "Field 'volume': must be greater than or equal to 0"
        );

        let high = validate_document(&schema, &json!({"volume": 101}));
        assert_eq!(
            high.errors[0].message,
            "Field 'volume': must be less than or equal to 100"
        );
    }

    #[test]
    fn format_violation() {
        let schema = doc(json!({
            "properties": {"harvestDate": {"type": "string", "format": "date"}}
        }));
        let result = validate_document(&schema, &json!({"harvestDate": "yesterday"}));
        assert_eq!(categories(&result), vec![ErrorCategory::Format]);
        assert_eq!(result.errors[0].message, "Field 'harvestDate': must be a valid date");
    }

    #[test]
    fn other_keywords_use_validator_message() {
        let schema = doc(json!({"type": "object", "additionalProperties": false}));
        let result = validate_document(&schema, &json!({"extra": 1}));
        assert_eq!(categories(&result), vec![ErrorCategory::Other]);
        assert!(result.errors[0].field.is_none());
        assert!(!result.errors[0].message.contains('\n'));
    }

    #[test]
    fn root_type_error_uses_root_token() {
        let schema = doc(json!({"type": "object"}));
        let result = validate_document(&schema, &json!([1, 2]));
        assert_eq!(result.errors[0].field, None);
        assert_eq!(result.errors[0].message, "Field 'root': expected type object");
    }

    #[test]
    fn array_items_use_index_segments() {
        let schema = doc(json!({
            "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
        }));
        let result = validate_document(&schema, &json!({"tags": ["ok", 7]}));
        assert_eq!(result.errors[0].field.as_deref(), Some("tags.1"));
    }

    #[test]
    fn conformant_data_without_rules() {
        let schema = doc(json!({"type": "object", "required": ["a"]}));
        let result = validate_document(&schema, &json!({"a": 1}));
        assert!(result.valid);
        assert!(result.schema_valid);
        assert!(result.business_rules_valid);
        assert!(result.errors.is_empty());
        assert!(result.errors_by_type.is_empty());
        assert_eq!(result.message, "Validation successful");
        assert_eq!(result.outcome(), "valid");
    }

    #[test]
    fn uncompilable_schema_is_reported_not_raised() {
        let schema = doc(json!({"type": "object", "properties": {"a": {"pattern": "(["}}}));
        let result = validate_document(&schema, &json!({"a": "x"}));
        assert!(!result.valid);
        assert_eq!(result.message, "Validation error");
        assert_eq!(result.outcome(), "error");
    }

    #[test]
    fn dotted_path_conversion() {
        assert_eq!(dotted_path(""), None);
        assert_eq!(dotted_path("/a/0/b").as_deref(), Some("a.0.b"));
        assert_eq!(dotted_path("/a~1b/c~0d").as_deref(), Some("a/b.c~d"));
    }

    #[test]
    fn serialized_shape() {
        let schema = doc(json!({"type": "object", "required": ["a"]}));
        let result = validate_document(&schema, &json!({}));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errors"][0]["type"], "required");
        assert_eq!(json["errors"][0]["field"], "a");
        assert_eq!(json["errors_by_type"]["required"].as_array().unwrap().len(), 1);
        assert!(json["errors"][0].get("pattern").is_none());
    }

    #[test]
    fn entity_validator_reads_repository() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("traceable_unit");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(SCHEMA_FILE),
            r#"{"schema": {"type": "object", "required": ["id"]}}"#,
        )
        .unwrap();
        let validator = EntityValidator::new(SchemaRepository::new(tmp.path()));

        assert!(validator.validate("TraceableUnit", &json!({"id": "TU-1"})).valid);
        let missing = validator.validate("TraceableUnit", &json!({}));
        assert_eq!(missing.errors[0].category, ErrorCategory::Required);
    }

    #[test]
    fn missing_schema_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let validator = EntityValidator::new(SchemaRepository::new(tmp.path()));
        let result = validator.validate("Ghost", &json!({"a": 1}));
        assert!(!result.valid);
        assert!(!result.schema_valid);
        assert_eq!(result.message, "Schema file not found");
        assert_eq!(result.errors[0].category, ErrorCategory::Schema);
        assert!(result.errors[0].message.starts_with("Schema not found:"));
    }

    #[test]
    fn malformed_schema_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("broken");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SCHEMA_FILE), "{").unwrap();
        let validator = EntityValidator::new(SchemaRepository::new(tmp.path()));
        let result = validator.validate("Broken", &json!({}));
        assert!(!result.schema_valid);
        assert_eq!(result.message, "Schema could not be parsed");
    }

    #[test]
    fn invalid_entity_name_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let validator = EntityValidator::new(SchemaRepository::new(tmp.path()));
        let result = validator.validate("../etc", &json!({}));
        assert_eq!(result.message, "Schema file not found");
    }
}
