use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::interface::{Access, AuthError, CredentialStore, Result, Session, UserRepository};
use super::model::{CredentialRecord, TokenScope, User, UserPatch};
use crate::services::hashing;
use crate::services::jwt::{TokenIssuer, TokenKind};
use crate::services::mailer::{
    Address, EmailJob, EmailQueue, MailData, VERIFY_EMAIL_TEMPLATE, WELCOME_EMAIL_TEMPLATE,
};
use crate::services::metrics::MetricsRegistry;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 20;

/// Account lifecycle: registration, verification, sessions and profile
/// changes. The only place that combines password hashing with token minting.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<TokenIssuer>,
    email: EmailQueue,
    metrics: Arc<MetricsRegistry>,
    verification_ttl: Duration,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<TokenIssuer>,
        email: EmailQueue,
        metrics: Arc<MetricsRegistry>,
        verification_ttl: Duration,
    ) -> Self {
        Self {
            users,
            credentials,
            tokens,
            email,
            metrics,
            verification_ttl,
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let password_hash = hash_password(password)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            profile_photo: None,
            verified: false,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.users.insert(&user).await {
            let outcome = if matches!(e, AuthError::DuplicateUser) { "duplicate" } else { "error" };
            self.metrics.record_auth("register", outcome);
            return Err(e);
        }

        // The account exists at this point; a lost code can be re-requested.
        if let Err(e) = self.send_verification_code(&user).await {
            tracing::error!(error = %e, user_id = %user.id, "failed to store verification code");
        }

        tracing::info!(user_id = %user.id, "user registered");
        self.metrics.record_auth("register", "success");
        Ok(user)
    }

    pub async fn verify(&self, email: &str, code: &str) -> Result<User> {
        let token_hash = hashing::hash_token(code);

        let Some(mut user) = self
            .credentials
            .find(&token_hash, TokenScope::Verification, email)
            .await?
        else {
            self.metrics.record_auth("verify", "invalid");
            return Err(AuthError::InvalidToken);
        };

        // Consuming the record first keeps the code single-use when two
        // requests race with the same code.
        if !self
            .credentials
            .delete(&token_hash, TokenScope::Verification, user.id)
            .await?
        {
            self.metrics.record_auth("verify", "invalid");
            return Err(AuthError::InvalidToken);
        }

        user.verified = true;
        user.updated_at = Utc::now();
        self.users.update(&user).await?;

        self.email.enqueue(EmailJob {
            recipients: vec![address_of(&user)],
            template: WELCOME_EMAIL_TEMPLATE,
            data: MailData {
                address: address_of(&user),
                code: None,
            },
        });

        tracing::info!(user_id = %user.id, "email verified");
        self.metrics.record_auth("verify", "success");
        Ok(user)
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if user.verified {
            return Err(AuthError::AlreadyVerified);
        }

        self.send_verification_code(&user).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.metrics.record_auth("login", "invalid");
            return Err(AuthError::InvalidCredentials);
        };

        if !user.verified {
            self.metrics.record_auth("login", "unverified");
            return Err(AuthError::UnverifiedUser);
        }

        if !hashing::verify_password(password, &user.password_hash) {
            self.metrics.record_auth("login", "invalid");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue_refresh(user.id, &user.email)?;
        self.credentials
            .put(&CredentialRecord {
                token_hash: hashing::hash_token(&issued.token),
                user_id: user.id,
                scope: TokenScope::Authentication,
                expires_at: issued.expires_at,
            })
            .await?;

        tracing::info!(user_id = %user.id, "session created");
        self.metrics.record_auth("login", "success");
        Ok(Session {
            user,
            refresh_token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Mints an access token from a live, store-backed refresh token. The
    /// refresh token stays valid until it expires or is logged out.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Access> {
        let claims = match self.tokens.validate(refresh_token, TokenKind::Refresh) {
            Ok(claims) => claims,
            Err(e) => {
                self.metrics.record_auth("refresh", "invalid");
                return Err(e.into());
            }
        };

        let token_hash = hashing::hash_token(refresh_token);
        let Some(user) = self
            .credentials
            .find(&token_hash, TokenScope::Authentication, &claims.email)
            .await?
        else {
            self.metrics.record_auth("refresh", "revoked");
            return Err(AuthError::InvalidToken);
        };

        let issued = self.tokens.issue_access(user.id, &user.email)?;

        self.metrics.record_auth("refresh", "success");
        Ok(Access {
            access_token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Revokes a refresh token. Revoking an already revoked token succeeds.
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        let claims = self.tokens.validate(refresh_token, TokenKind::Refresh)?;
        let user_id = claims.subject_id()?;

        let token_hash = hashing::hash_token(refresh_token);
        if self
            .credentials
            .delete(&token_hash, TokenScope::Authentication, user_id)
            .await?
        {
            tracing::info!("refresh token revoked");
        }

        self.metrics.record_auth("logout", "success");
        Ok(())
    }

    pub async fn fetch_user(&self, id: Uuid) -> Result<User> {
        self.users.find_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    pub async fn update_profile(&self, id: Uuid, patch: UserPatch) -> Result<User> {
        let current = self.fetch_user(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let password_hash = match patch.password.as_deref() {
            Some(password) => {
                check_password_strength(password)?;
                if hashing::verify_password(password, &current.password_hash) {
                    current.password_hash.clone()
                } else {
                    hash_password(password)?
                }
            }
            None => current.password_hash.clone(),
        };

        let mut user = patch.apply(current);
        user.password_hash = password_hash;
        user.updated_at = Utc::now();

        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    /// Accounts can only be deleted by their owner.
    pub async fn delete_user(&self, actor: Uuid, id: Uuid) -> Result<()> {
        if actor != id {
            return Err(AuthError::Forbidden);
        }

        if !self.users.delete(id).await? {
            return Err(AuthError::NotFound);
        }

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn send_verification_code(&self, user: &User) -> Result<()> {
        let code = hashing::generate_otp();

        self.credentials
            .put(&CredentialRecord {
                token_hash: hashing::hash_token(&code),
                user_id: user.id,
                scope: TokenScope::Verification,
                expires_at: Utc::now() + self.verification_ttl,
            })
            .await?;

        self.email.enqueue(EmailJob {
            recipients: vec![address_of(user)],
            template: VERIFY_EMAIL_TEMPLATE,
            data: MailData {
                address: address_of(user),
                code: Some(code),
            },
        });

        Ok(())
    }
}

pub fn check_password_strength(password: &str) -> Result<()> {
    let len = password.chars().count();
    if (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        Ok(())
    } else {
        Err(AuthError::WeakPassword)
    }
}

fn hash_password(password: &str) -> Result<String> {
    hashing::hash_password(password).map_err(|e| AuthError::Internal(e.to_string()))
}

fn address_of(user: &User) -> Address {
    Address {
        name: user.name.clone(),
        email: user.email.clone(),
    }
}
