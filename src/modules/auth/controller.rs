use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::{
    interface::AuthError,
    middleware::AuthUser,
    schema::{
        AccessResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest,
        ResendVerificationRequest, UpdateProfileRequest, UserEnvelope, UserResponse,
        VerifyRequest,
    },
};
use crate::modules::shared::{MessageResponse, ValidatedJson};
use crate::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), AuthError> {
    let user = state
        .identity
        .register(req.name.trim(), &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope { user: user.into() }),
    ))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<VerifyRequest>,
) -> Result<Json<UserEnvelope>, AuthError> {
    let user = state.identity.verify(&req.email, &req.code).await?;
    Ok(Json(UserEnvelope { user: user.into() }))
}

pub async fn request_verification(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ResendVerificationRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    state.identity.resend_verification(&req.email).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(format!(
            "a new verification code has been sent to '{}'",
            req.email
        ))),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let session = state.identity.login(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

pub async fn access(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<AccessResponse>, AuthError> {
    let access = state.identity.refresh_session(&req.refresh_token).await?;
    Ok(Json(access.into()))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    state.identity.logout(&req.refresh_token).await?;
    Ok(Json(MessageResponse::new("logged out")))
}

// =============================================================================
// USERS (protected)
// =============================================================================

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AuthError> {
    let user = state.identity.fetch_user(id).await?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    let user = state
        .identity
        .update_profile(auth.user_id, req.into())
        .await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AuthError> {
    state.identity.delete_user(auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("user successfully deleted")))
}
