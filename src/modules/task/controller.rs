use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::AuthUser;
use crate::modules::shared::{MessageResponse, ValidatedJson};
use crate::modules::task::schema::{
    AssignTaskRequest, AssigneeList, CreateTaskRequest, TaskEnvelope, TaskList, UpdateTaskRequest,
};
use crate::modules::workspace::WorkspaceError;
use crate::AppState;

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskEnvelope>), WorkspaceError> {
    let task = state
        .tasks
        .create(project_id, auth.user_id, req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(TaskEnvelope { task: task.into() })))
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<TaskList>, WorkspaceError> {
    let tasks = state.tasks.list(project_id, auth.user_id).await?;
    Ok(Json(TaskList {
        tasks: tasks.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskEnvelope>, WorkspaceError> {
    let task = state.tasks.get(id, auth.user_id).await?;
    Ok(Json(TaskEnvelope { task: task.into() }))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<TaskEnvelope>, WorkspaceError> {
    let task = state.tasks.update(id, auth.user_id, req.into()).await?;
    Ok(Json(TaskEnvelope { task: task.into() }))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, WorkspaceError> {
    state.tasks.delete(id, auth.user_id).await?;
    Ok(Json(MessageResponse::new("task deleted")))
}

// =============================================================================
// ASSIGNMENTS
// =============================================================================

pub async fn list_assignees(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssigneeList>, WorkspaceError> {
    let assignees = state.tasks.list_assignees(id, auth.user_id).await?;
    Ok(Json(AssigneeList {
        assignees: assignees.into_iter().map(Into::into).collect(),
    }))
}

pub async fn assign_task(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AssignTaskRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), WorkspaceError> {
    state.tasks.assign(id, auth.user_id, req.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("task assigned")),
    ))
}

pub async fn unassign_task(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, WorkspaceError> {
    state.tasks.unassign(id, auth.user_id, user_id).await?;
    Ok(Json(MessageResponse::new("assignment removed")))
}
