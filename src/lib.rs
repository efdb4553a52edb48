//! Student registry: REST backend for students and the courses they enrol in.

pub mod config;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{ServiceConfig, StoreKind};
pub use error::{AppError, ConfigError};
pub use gateway::{Gateway, GatewayError, MemoryGateway, PgGateway, Session};
pub use routes::{common_routes_with_ready, registry_routes};
pub use service::RegistryService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, StoreError};

use axum::{middleware::map_response, Router};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Full application: probes at the root, registry routes under `config.base_path`,
/// with request tracing, a per-request timeout, and a body size cap. Timeout and
/// size-limit rejections carry the same `{"Message"}` body as handler errors.
pub fn app(state: AppState, config: &ServiceConfig) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest(&config.base_path, registry_routes(state))
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(map_response(response::middleware_error_body))
        .layer(TraceLayer::new_for_http())
}
