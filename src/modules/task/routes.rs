use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

/// Task-by-id routes. Listing and creation live under
/// `/projects/{id}/tasks`.
pub fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{id}",
            get(controller::get_task)
                .patch(controller::update_task)
                .delete(controller::delete_task),
        )
        .route(
            "/{id}/assignments",
            get(controller::list_assignees).post(controller::assign_task),
        )
        .route("/{id}/assignments/{user_id}", delete(controller::unassign_task))
}
