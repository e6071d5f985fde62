use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool};
use uuid::Uuid;

use super::interface::{AuthError, CredentialStore, Result, UserRepository};
use super::model::{CredentialRecord, TokenScope, User};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, profile_photo, verified, created_at, updated_at";

/// MySQL-backed users and credential records.
#[derive(Clone)]
pub struct UserCrud {
    pool: Pool<MySql>,
}

impl UserCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

fn map_user_write_error(err: sqlx::Error) -> AuthError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AuthError::DuplicateUser
        }
        other => AuthError::Database(other),
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, profile_photo, verified, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_photo)
        .bind(user.verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, password_hash = ?, profile_photo = ?, verified = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_photo)
        .bind(user.verified)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        // MySQL reports matched-but-unchanged rows as 0 affected, so only a
        // missing row is treated as an error.
        if result.rows_affected() == 0 && self.find_by_id(user.id).await?.is_none() {
            return Err(AuthError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CredentialStore for UserCrud {
    async fn put(&self, record: &CredentialRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_tokens (token_hash, user_id, scope, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.token_hash)
        .bind(record.user_id)
        .bind(record.scope.as_str())
        .bind(record.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, token_hash: &str, scope: TokenScope, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.profile_photo, u.verified, u.created_at, u.updated_at
            FROM users u
            INNER JOIN user_tokens t ON t.user_id = u.id
            WHERE t.token_hash = ? AND t.scope = ? AND u.email = ? AND t.expires_at > ?
            LIMIT 1
            "#,
        )
        .bind(token_hash)
        .bind(scope.as_str())
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, token_hash: &str, scope: TokenScope, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM user_tokens WHERE token_hash = ? AND scope = ? AND user_id = ?",
        )
        .bind(token_hash)
        .bind(scope.as_str())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
