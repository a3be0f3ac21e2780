//! # API Error Types
//!
//! Every failure leaves the service as `{"error": "<message>"}` with a
//! conventional status code. Internal details are logged, never returned.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use boost_schema::SchemaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request envelope is malformed or incomplete (400).
    #[error("{0}")]
    BadRequest(String),

    /// The entity or one of its files does not exist or cannot be read (404).
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure (500). Message is logged but not returned to client.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Repository failures on entity resource routes are reported as 404.
/// Files that exist but cannot be used are also logged.
impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        if err.is_not_found() {
            tracing::debug!(error = %err, "entity resource missing");
        } else {
            tracing::warn!(error = %err, "entity resource unusable");
        }
        Self::NotFound(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn schema_errors_map_to_not_found() {
        let err = AppError::from(SchemaError::Parse {
            path: PathBuf::from("traceable_unit/validation_schema.json"),
            reason: "EOF".into(),
        });
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("EOF")));
    }

    #[test]
    fn missing_resources_map_to_not_found() {
        let err = SchemaError::NotFound {
            what: "schema file",
            path: PathBuf::from("supply_base/validation_schema.json"),
        };
        assert!(err.is_not_found());
        let err = AppError::from(err);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().starts_with("schema file not found"));
    }

    #[test]
    fn internal_message_is_hidden() {
        let response = AppError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
