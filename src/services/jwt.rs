use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates what a signed token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "ACCESS")]
    Access,
    #[serde(rename = "REFRESH")]
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // user id
    pub email: String,
    pub token_type: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,        // unique token id
}

impl Claims {
    pub fn subject_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("signing key is not configured")]
    MissingKey,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    // Bad signature, malformed, expired and wrong kind all collapse here.
    #[error("token is invalid or expired")]
    Invalid,
}

/// Mints and validates HS256 access and refresh tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingKey);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl: Duration::hours(2),
            refresh_token_ttl: Duration::days(15),
        })
    }

    pub fn with_ttls(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_ttl = access;
        self.refresh_token_ttl = refresh;
        self
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            token_type: kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to sign token");
                TokenError::Signing(e)
            })?;

        Ok(IssuedToken { token, expires_at })
    }

    pub fn issue_access(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, email, TokenKind::Access, self.access_token_ttl)
    }

    pub fn issue_refresh(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, email, TokenKind::Refresh, self.refresh_token_ttl)
    }

    /// Verifies signature, expiry and kind. A valid token of the wrong kind
    /// is rejected, so refresh tokens cannot be replayed as access tokens.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?
            .claims;

        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Invalid);
        }

        if claims.token_type != expected {
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }
}
