use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::shared::ErrorResponse;
use crate::services::jwt::TokenKind;
use crate::AppState;

/// Authenticated subject, injected by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("missing or invalid access token")),
    )
        .into_response()
}

/// Rejects requests without a valid `Authorization: Bearer <access token>`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        return unauthorized();
    };

    let claims = match state.tokens.validate(token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "rejected access token");
            return unauthorized();
        }
    };

    let Ok(user_id) = claims.subject_id() else {
        return unauthorized();
    };

    req.extensions_mut().insert(AuthUser {
        user_id,
        email: claims.email,
    });

    next.run(req).await
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only reachable on routes mounted without the gate.
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(unauthorized)
    }
}
