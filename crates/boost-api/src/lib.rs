//! # boost-api — HTTP Facade for the BOOST Schema Repository
//!
//! ## API Surface
//!
//! | Route                                        | Module                      |
//! |----------------------------------------------|-----------------------------|
//! | `GET /api/entities`                          | [`routes::entities`]        |
//! | `GET /api/entity/{name}/schema`              | [`routes::entities`]        |
//! | `GET /api/entity/{name}/examples`            | [`routes::entities`]        |
//! | `GET /api/entity/{name}/example[/{example}]` | [`routes::entities`]        |
//! | `GET /api/entity/{name}/dictionary`          | [`routes::entities`]        |
//! | `POST /api/validate`                         | [`routes::validate`]        |
//! | `GET /health`, `GET /metrics`                | [`routes::health`]          |
//! | `GET /openapi.json`                          | [`openapi`]                 |
//!
//! ## Middleware Stack (outermost first)
//!
//! ```text
//! TraceLayer → CorsLayer (permissive) → DefaultBodyLimit (2 MiB) → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No domain logic in handlers; everything delegates to `boost-schema`.
//! - All errors map to `{"error": ...}` bodies via [`AppError`].

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

/// Maximum accepted request body size.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::entities::router())
        .merge(routes::validate::router())
        .merge(routes::health::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
