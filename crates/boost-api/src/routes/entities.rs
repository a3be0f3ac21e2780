//! # Entity Resource Routes
//!
//! - `GET /api/entities` — sorted entity catalog
//! - `GET /api/entity/{name}/schema` — JSON Schema, unwrapped from its envelope
//! - `GET /api/entity/{name}/examples` — every example payload with its label
//! - `GET /api/entity/{name}/example` — default example, or `{}`
//! - `GET /api/entity/{name}/example/{example_name}` — named example, falling back to the default
//! - `GET /api/entity/{name}/dictionary` — parsed field dictionary
//!
//! Any repository failure below `/api/entity/{name}` is a 404. Repository
//! reads run on the blocking pool.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use boost_core::EntityName;
use boost_schema::{Dictionary, ExampleRecord, SchemaError, SchemaRepository};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the entity resource router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/entities", get(list_entities))
        .route("/api/entity/{name}/schema", get(get_schema))
        .route("/api/entity/{name}/examples", get(list_examples))
        .route("/api/entity/{name}/example", get(get_default_example))
        .route("/api/entity/{name}/example/{example_name}", get(get_named_example))
        .route("/api/entity/{name}/dictionary", get(get_dictionary))
}

/// Entity catalog.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntityList {
    /// PascalCase entity names, sorted.
    pub entities: Vec<String>,
}

/// One example payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExampleSummary {
    /// Display label.
    pub name: String,
    /// File name inside the entity directory.
    pub filename: String,
    /// Example payload.
    #[schema(value_type = Object)]
    pub data: Value,
}

impl From<ExampleRecord> for ExampleSummary {
    fn from(record: ExampleRecord) -> Self {
        Self {
            name: record.name,
            filename: record.filename,
            data: record.data,
        }
    }
}

fn parse_entity(name: &str) -> Result<EntityName, AppError> {
    EntityName::parse(name).map_err(|e| AppError::from(SchemaError::from(e)))
}

/// Run `read` against the repository off the async runtime.
///
/// The outer error is a failed task; the inner one is the repository's.
async fn with_repository<T, F>(
    state: &AppState,
    read: F,
) -> Result<Result<T, SchemaError>, AppError>
where
    T: Send + 'static,
    F: FnOnce(&SchemaRepository) -> Result<T, SchemaError> + Send + 'static,
{
    let repository = state.repository().clone();
    tokio::task::spawn_blocking(move || read(&repository))
        .await
        .map_err(|e| AppError::Internal(format!("repository task failed: {e}")))
}

/// List all entities with a schema file.
#[utoipa::path(
    get,
    path = "/api/entities",
    responses(
        (status = 200, description = "Sorted entity names", body = EntityList),
        (status = 500, description = "Schema root unreadable", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn list_entities(
    State(state): State<AppState>,
) -> Result<Json<EntityList>, AppError> {
    let entities = with_repository(&state, |repo| repo.list_entities())
        .await?
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(EntityList {
        entities: entities.into_iter().map(String::from).collect(),
    }))
}

/// Return the JSON Schema of an entity.
#[utoipa::path(
    get,
    path = "/api/entity/{name}/schema",
    params(("name" = String, Path, description = "PascalCase entity name")),
    responses(
        (status = 200, description = "JSON Schema document", body = serde_json::Value),
        (status = 404, description = "Schema missing or malformed", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn get_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let entity = parse_entity(&name)?;
    let schema = with_repository(&state, move |repo| repo.load_schema(&entity)).await??;
    Ok(Json(schema))
}

/// List the example payloads of an entity, sorted by file name.
#[utoipa::path(
    get,
    path = "/api/entity/{name}/examples",
    params(("name" = String, Path, description = "PascalCase entity name")),
    responses(
        (status = 200, description = "Example payloads", body = Vec<ExampleSummary>),
        (status = 404, description = "Entity directory missing", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn list_examples(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ExampleSummary>>, AppError> {
    let entity = parse_entity(&name)?;
    let examples = with_repository(&state, move |repo| repo.list_examples(&entity)).await??;
    Ok(Json(examples.into_iter().map(ExampleSummary::from).collect()))
}

/// Return the default example of an entity, or `{}` if it has none.
#[utoipa::path(
    get,
    path = "/api/entity/{name}/example",
    params(("name" = String, Path, description = "PascalCase entity name")),
    responses(
        (status = 200, description = "Example payload", body = serde_json::Value),
        (status = 404, description = "Example unreadable", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn get_default_example(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let entity = parse_entity(&name)?;
    let example = with_repository(&state, move |repo| repo.load_example(&entity, None)).await??;
    Ok(Json(example))
}

/// Return a named example of an entity.
///
/// Falls back to the default example, then to `{}`.
#[utoipa::path(
    get,
    path = "/api/entity/{name}/example/{example_name}",
    params(
        ("name" = String, Path, description = "PascalCase entity name"),
        ("example_name" = String, Path, description = "Example file stem"),
    ),
    responses(
        (status = 200, description = "Example payload", body = serde_json::Value),
        (status = 404, description = "Example unreadable", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn get_named_example(
    State(state): State<AppState>,
    Path((name, example_name)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let entity = parse_entity(&name)?;
    let example = with_repository(&state, move |repo| {
        repo.load_example(&entity, Some(example_name.as_str()))
    })
    .await??;
    Ok(Json(example))
}

/// Return the parsed field dictionary of an entity.
#[utoipa::path(
    get,
    path = "/api/entity/{name}/dictionary",
    params(("name" = String, Path, description = "PascalCase entity name")),
    responses(
        (status = 200, description = "Overview and field table", body = serde_json::Value),
        (status = 404, description = "Dictionary missing or unreadable", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn get_dictionary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Dictionary>, AppError> {
    let entity = parse_entity(&name)?;
    let label = entity.to_string();
    let dictionary = with_repository(&state, move |repo| repo.load_dictionary(&entity)).await??;
    if !dictionary.issues.is_empty() {
        metrics::counter!("boost_dictionary_parse_issues_total")
            .increment(dictionary.issues.len() as u64);
        tracing::warn!(entity = %label, issues = dictionary.issues.len(), "dictionary parsed with issues");
    }
    Ok(Json(dictionary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::TempDir;

    fn state(root: &std::path::Path) -> AppState {
        AppState::new(AppConfig::new(root))
    }

    #[tokio::test]
    async fn repository_reads_run_off_the_runtime() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("organization")).unwrap();
        std::fs::write(
            tmp.path().join("organization/validation_schema.json"),
            "{}",
        )
        .unwrap();
        let entities = with_repository(&state(tmp.path()), |repo| repo.list_entities())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entities.len(), 1);
    }

    #[tokio::test]
    async fn failed_repository_task_is_internal() {
        let tmp = TempDir::new().unwrap();
        let err = with_repository(&state(tmp.path()), |_| -> Result<(), SchemaError> {
            panic!("read blew up")
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(ref m) if m.contains("repository task failed")));
    }
}
