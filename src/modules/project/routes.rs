use axum::{routing::get, Router};
use std::sync::Arc;

use super::controller;
use crate::modules::task::controller as task_controller;
use crate::AppState;

/// Project-by-id routes. Listing and creation live under
/// `/workspaces/{id}/projects`.
pub fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{id}",
            get(controller::get_project)
                .patch(controller::update_project)
                .delete(controller::delete_project),
        )
        .route(
            "/{id}/tasks",
            get(task_controller::list_tasks).post(task_controller::create_task),
        )
}
