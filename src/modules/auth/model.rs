use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_photo: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purpose a stored credential was issued for. A record is only ever
/// matched against the scope of the operation consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Verification,
    Authentication,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Authentication => "authentication",
        }
    }
}

/// Persisted credential: the digest of a raw secret, never the secret.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub token_hash: String,
    pub user_id: Uuid,
    pub scope: TokenScope,
    pub expires_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Partial profile update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_photo: Option<String>,
}

impl UserPatch {
    /// Merges the plain fields into `user`. The password is not touched here
    /// because replacing it needs hashing.
    pub fn apply(&self, mut user: User) -> User {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(photo) = &self.profile_photo {
            user.profile_photo = Some(photo.clone());
        }
        user
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.profile_photo.is_none()
    }
}
