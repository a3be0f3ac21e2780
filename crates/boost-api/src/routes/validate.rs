//! # Validation Route
//!
//! `POST /api/validate` with `{entity_name, test_data}`.
//!
//! The envelope is checked before the repository is touched: a missing,
//! null or empty `entity_name`, or a missing or null `test_data`, is a 400.
//! Everything past that point answers 200 with a `ValidationResult`, even
//! when the schema cannot be found or the validation task dies.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use boost_schema::ValidationResult;
use tokio::task::JoinError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the validation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/validate", post(validate))
}

/// Request body of `POST /api/validate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateRequest {
    /// PascalCase entity name.
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Candidate payload.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub test_data: Option<Value>,
}

impl ValidateRequest {
    fn into_parts(self) -> Result<(String, Value), AppError> {
        let entity_name = self
            .entity_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::BadRequest("entity_name is required".into()))?;
        let test_data = self
            .test_data
            .ok_or_else(|| AppError::BadRequest("test_data is required".into()))?;
        Ok((entity_name, test_data))
    }
}

/// Validate a payload against an entity schema.
#[utoipa::path(
    post,
    path = "/api/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation result", body = serde_json::Value),
        (status = 400, description = "Envelope incomplete or not JSON", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub(crate) async fn validate(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidationResult>, AppError> {
    let Json(request) = body?;
    let (entity_name, test_data) = request.into_parts()?;

    let validator = state.validator.clone();
    let joined =
        tokio::task::spawn_blocking(move || validator.validate(&entity_name, &test_data)).await;
    let result = settle(joined);

    metrics::counter!("boost_validations_total", "outcome" => result.outcome()).increment(1);
    Ok(Json(result))
}

fn settle(joined: Result<ValidationResult, JoinError>) -> ValidationResult {
    joined.unwrap_or_else(|e| {
        tracing::error!(error = %e, "validation task failed");
        ValidationResult::validation_error(&e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn panicked_task_becomes_validation_error() {
        let joined = tokio::task::spawn_blocking(|| -> ValidationResult {
            panic!("validator blew up")
        })
        .await;
        let result = settle(joined);
        assert!(!result.valid);
        assert!(!result.schema_valid);
        assert_eq!(result.message, "Validation error");
        assert_eq!(result.outcome(), "error");
        assert!(result.errors[0].message.starts_with("Validation error: "));
    }

    fn request(body: Value) -> ValidateRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn complete_envelope() {
        let (name, data) = request(json!({"entity_name": "Organization", "test_data": {}}))
            .into_parts()
            .unwrap();
        assert_eq!(name, "Organization");
        assert_eq!(data, json!({}));
    }

    #[test]
    fn missing_or_empty_entity_name() {
        for body in [
            json!({"test_data": {}}),
            json!({"entity_name": null, "test_data": {}}),
            json!({"entity_name": "", "test_data": {}}),
        ] {
            let err = request(body).into_parts().unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("entity_name")));
        }
    }

    #[test]
    fn missing_or_null_test_data() {
        for body in [
            json!({"entity_name": "Organization"}),
            json!({"entity_name": "Organization", "test_data": null}),
        ] {
            let err = request(body).into_parts().unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("test_data")));
        }
    }
}
