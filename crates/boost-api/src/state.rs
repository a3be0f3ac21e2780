//! # Application State
//!
//! Shared, immutable state passed to every handler. Nothing here is
//! mutated after startup; each request re-reads the repository files it
//! needs.

use std::sync::Arc;

use boost_schema::{EntityValidator, SchemaRepository};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration resolved at startup.
    pub config: Arc<AppConfig>,
    /// Validator over the configured schema repository.
    pub validator: Arc<EntityValidator>,
    /// Prometheus renderer, present when the binary installed a recorder.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state for `config` without a metrics recorder.
    pub fn new(config: AppConfig) -> Self {
        let repository = SchemaRepository::new(config.schema_root.clone());
        Self {
            config: Arc::new(config),
            validator: Arc::new(EntityValidator::new(repository)),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `GET /metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// The schema repository.
    pub fn repository(&self) -> &SchemaRepository {
        self.validator.repository()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
