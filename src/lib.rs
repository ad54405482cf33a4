pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod swagger;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;


use axum::{extract::State, response::Json, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use db::EmployeeStore;
use models::{HealthResponse, MessageResponse};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EmployeeStore>,
}

/// Liveness endpoint
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service is running", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Employee Management API"))
}

/// Health check endpoint for monitoring. Always answers 200; store problems
/// are reported in the body.
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Store connectivity", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    match state.store.ping().await {
        Ok(()) => Json(HealthResponse::healthy()),
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            Json(HealthResponse::unhealthy(e.to_string()))
        }
    }
}

/// Builds the full application router with middleware and state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::employees::router())
        .merge(swagger::create_swagger_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
