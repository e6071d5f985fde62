use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::interface::{Access, Session};
use super::model::{User, UserPatch};

// =============================================================================
// REGISTER / VERIFY
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 20, message = "password must be 8 to 20 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(equal = 6, message = "code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

// =============================================================================
// SESSIONS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.into(),
            refresh_token: session.refresh_token,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Access> for AccessResponse {
    fn from(access: Access) -> Self {
        Self {
            access_token: access.access_token,
            expires_at: access.expires_at,
        }
    }
}

// =============================================================================
// USERS
// =============================================================================

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_photo: user.profile_photo,
            verified: user.verified,
            created_at: user.created_at,
            last_modified: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    // Length is checked by the service so a bad value maps to WeakPassword.
    pub password: Option<String>,
    #[validate(length(max = 512, message = "profilePhoto is too long"))]
    pub profile_photo: Option<String>,
}

impl From<UpdateProfileRequest> for UserPatch {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            profile_photo: req.profile_photo,
        }
    }
}
