//! # OpenAPI Specification Assembly
//!
//! Collects every utoipa-documented route into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BOOST Schema Service",
        description = "Entity catalog, JSON Schemas, example payloads, field dictionaries and payload validation for the BOOST data standard.",
    ),
    paths(
        crate::routes::entities::list_entities,
        crate::routes::entities::get_schema,
        crate::routes::entities::list_examples,
        crate::routes::entities::get_default_example,
        crate::routes::entities::get_named_example,
        crate::routes::entities::get_dictionary,
        crate::routes::validate::validate,
        crate::routes::health::health,
        crate::routes::health::prometheus_metrics,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::entities::EntityList,
        crate::routes::entities::ExampleSummary,
        crate::routes::validate::ValidateRequest,
    )),
    tags(
        (name = "entities", description = "Entity schemas, examples and dictionaries"),
        (name = "validation", description = "Payload validation against entity schemas"),
        (name = "operations", description = "Liveness and metrics"),
    )
)]
pub struct ApiDoc;

/// Router serving `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
