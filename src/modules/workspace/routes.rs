use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::modules::project::controller as project_controller;
use crate::AppState;

pub fn workspace_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(controller::create_workspace))
        .route("/me", get(controller::list_my_workspaces))
        .route(
            "/{id}",
            get(controller::get_workspace)
                .patch(controller::update_workspace)
                .delete(controller::delete_workspace),
        )
        .route(
            "/{id}/members",
            get(controller::list_members).post(controller::add_member),
        )
        .route("/{id}/members/{user_id}", delete(controller::remove_member))
        .route(
            "/{id}/projects",
            get(project_controller::list_projects).post(project_controller::create_project),
        )
}
