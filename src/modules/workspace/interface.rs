use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::model::{Member, Role, Workspace};
use crate::modules::shared::ErrorResponse;

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Inserts the workspace and its owner membership atomically.
    async fn create_with_owner(&self, workspace: &Workspace) -> Result<()>;
    async fn find(&self, id: Uuid) -> Result<Option<Workspace>>;
    async fn update(&self, workspace: &Workspace) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Workspace>>;
    async fn membership(&self, workspace_id: Uuid, user_id: Uuid) -> Result<Option<Role>>;
    /// Fails with `DuplicateEntry` if the user is already a member.
    async fn add_member(&self, workspace_id: Uuid, user_id: Uuid, role: Role) -> Result<()>;
    /// Deletes a non-owner membership along with the user's task assignments
    /// in that workspace. Owner rows are never removed here.
    async fn remove_member(&self, workspace_id: Uuid, user_id: Uuid) -> Result<u64>;
    async fn list_members(&self, workspace_id: Uuid) -> Result<Vec<Member>>;
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not allowed to perform this action")]
    Forbidden,

    #[error("user is already a member of this workspace")]
    DuplicateEntry,

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkspaceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::DuplicateEntry => StatusCode::CONFLICT,
            Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WorkspaceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "workspace operation failed");
            "failed to complete operation".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
