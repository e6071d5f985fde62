pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::auth::{auth_routes, require_auth, user_routes, IdentityService};
use modules::metrics::metrics_routes;
use modules::project::{project_routes, ProjectService};
use modules::shared::MessageResponse;
use modules::task::{task_routes, TaskService};
use modules::workspace::{workspace_routes, WorkspaceService};
use services::jwt::TokenIssuer;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::security::SecurityHeadersLayer;

/// Shared handles for every request handler.
pub struct AppState {
    pub identity: IdentityService,
    pub workspaces: Arc<WorkspaceService>,
    pub projects: Arc<ProjectService>,
    pub tasks: TaskService,
    pub tokens: Arc<TokenIssuer>,
    pub metrics: Arc<MetricsRegistry>,
}

pub fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);
    let metrics = state.metrics.clone();

    let protected = Router::new()
        .nest("/users", user_routes())
        .nest("/workspaces", workspace_routes())
        .nest("/projects", project_routes())
        .nest("/tasks", task_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .route("/ping", get(ping))
        .nest("/auth", auth_routes())
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .merge(metrics_routes(metrics.clone()))
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(SecurityHeadersLayer)
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}
