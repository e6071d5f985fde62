use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::AuthUser;
use crate::modules::project::schema::{
    CreateProjectRequest, ProjectEnvelope, ProjectList, UpdateProjectRequest,
};
use crate::modules::shared::{MessageResponse, ValidatedJson};
use crate::modules::workspace::WorkspaceError;
use crate::AppState;

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(workspace_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectEnvelope>), WorkspaceError> {
    let project = state
        .projects
        .create(workspace_id, auth.user_id, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectEnvelope {
            project: project.into(),
        }),
    ))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<ProjectList>, WorkspaceError> {
    let projects = state.projects.list(workspace_id, auth.user_id).await?;
    Ok(Json(ProjectList {
        projects: projects.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectEnvelope>, WorkspaceError> {
    let project = state.projects.get(id, auth.user_id).await?;
    Ok(Json(ProjectEnvelope {
        project: project.into(),
    }))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> Result<Json<ProjectEnvelope>, WorkspaceError> {
    let project = state
        .projects
        .update(id, auth.user_id, req.into())
        .await?;
    Ok(Json(ProjectEnvelope {
        project: project.into(),
    }))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, WorkspaceError> {
    state.projects.delete(id, auth.user_id).await?;
    Ok(Json(MessageResponse::new("project deleted")))
}
