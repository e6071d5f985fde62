use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{CredentialRecord, TokenScope, User};
use crate::modules::shared::ErrorResponse;
use crate::services::jwt::TokenError;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

pub type Result<T> = std::result::Result<T, AuthError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateUser` when the email is already taken.
    async fn insert(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update(&self, user: &User) -> Result<()>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Hashed, scoped, expiring credentials (verification codes and refresh
/// tokens). Expired rows never match a lookup.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn put(&self, record: &CredentialRecord) -> Result<()>;
    /// Owner of a live record matching hash, scope and the owner's email.
    async fn find(&self, token_hash: &str, scope: TokenScope, email: &str) -> Result<Option<User>>;
    /// Removes the owner's records for this hash and scope and returns whether
    /// any existed. Only one of several concurrent callers sees `true`.
    /// Other users holding the same code are untouched.
    async fn delete(&self, token_hash: &str, scope: TokenScope, user_id: Uuid) -> Result<bool>;
    async fn delete_expired(&self) -> Result<u64>;
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("a user with this email already exists")]
    DuplicateUser,

    #[error("user not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email address has not been verified")]
    UnverifiedUser,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("password must be between 8 and 20 characters")]
    WeakPassword,

    #[error("email address is already verified")]
    AlreadyVerified,

    #[error("not allowed to perform this action")]
    Forbidden,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateUser | Self::AlreadyVerified => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::UnverifiedUser | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::WeakPassword => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::InvalidToken,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "identity operation failed");
            "failed to complete operation".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// SERVICE RESULT TYPES
// =============================================================================

/// Outcome of a successful login.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of exchanging a refresh token.
#[derive(Debug)]
pub struct Access {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}
