use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::AuthUser;
use crate::modules::shared::{MessageResponse, ValidatedJson};
use crate::modules::workspace::{
    interface::WorkspaceError,
    schema::{
        AddMemberRequest, CreateWorkspaceRequest, MemberList, UpdateWorkspaceRequest,
        WorkspaceEnvelope, WorkspaceList,
    },
};
use crate::AppState;

pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<WorkspaceEnvelope>), WorkspaceError> {
    let workspace = state
        .workspaces
        .create(req.name.trim(), &req.description, auth.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkspaceEnvelope {
            workspace: workspace.into(),
        }),
    ))
}

pub async fn list_my_workspaces(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<WorkspaceList>, WorkspaceError> {
    let workspaces = state.workspaces.list_for_user(auth.user_id).await?;
    Ok(Json(WorkspaceList {
        workspaces: workspaces.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceEnvelope>, WorkspaceError> {
    let workspace = state.workspaces.get(id, auth.user_id).await?;
    Ok(Json(WorkspaceEnvelope {
        workspace: workspace.into(),
    }))
}

pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateWorkspaceRequest>,
) -> Result<Json<WorkspaceEnvelope>, WorkspaceError> {
    let workspace = state
        .workspaces
        .update(id, auth.user_id, req.into())
        .await?;
    Ok(Json(WorkspaceEnvelope {
        workspace: workspace.into(),
    }))
}

pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, WorkspaceError> {
    state.workspaces.delete(id, auth.user_id).await?;
    Ok(Json(MessageResponse::new("workspace deleted")))
}

// =============================================================================
// MEMBERS
// =============================================================================

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberList>, WorkspaceError> {
    let members = state.workspaces.list_members(id, auth.user_id).await?;
    Ok(Json(MemberList {
        members: members.into_iter().map(Into::into).collect(),
    }))
}

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), WorkspaceError> {
    state
        .workspaces
        .add_member(id, auth.user_id, req.user_id, req.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("member added")),
    ))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, WorkspaceError> {
    state
        .workspaces
        .remove_member(id, auth.user_id, user_id)
        .await?;
    Ok(Json(MessageResponse::new("member removed")))
}
