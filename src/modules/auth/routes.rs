use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

/// Public account and session endpoints.
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/verify", post(controller::verify))
        .route("/verify/request", post(controller::request_verification))
        .route("/login", post(controller::login))
        .route("/access", post(controller::access))
        .route("/logout", post(controller::logout))
}

/// Account endpoints behind the access-token gate.
pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", patch(controller::update_profile))
        .route(
            "/{id}",
            get(controller::get_user).delete(controller::delete_user),
        )
}
