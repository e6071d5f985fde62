use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::interface::{Result, WorkspaceError, WorkspaceRepository};
use super::model::{Access, Member, Role, Workspace, WorkspacePatch};

/// Workspaces and their memberships. Every workspace-scoped call resolves
/// the caller's role through [`WorkspaceService::authorize`] first.
pub struct WorkspaceService {
    repo: Arc<dyn WorkspaceRepository>,
}

impl WorkspaceService {
    pub fn new(repo: Arc<dyn WorkspaceRepository>) -> Self {
        Self { repo }
    }

    /// Returns the caller's role if it grants `access`. Non-members get
    /// `NotFound` so workspace ids cannot be discovered.
    pub async fn authorize(&self, workspace_id: Uuid, actor: Uuid, access: Access) -> Result<Role> {
        let role = self
            .repo
            .membership(workspace_id, actor)
            .await?
            .ok_or(WorkspaceError::NotFound("workspace"))?;

        if !role.permits(access) {
            tracing::debug!(%workspace_id, %actor, role = %role, ?access, "workspace access denied");
            return Err(WorkspaceError::Forbidden);
        }

        Ok(role)
    }

    /// The user's role in a workspace, without any access check.
    pub async fn role_of(&self, workspace_id: Uuid, user_id: Uuid) -> Result<Option<Role>> {
        self.repo.membership(workspace_id, user_id).await
    }

    pub async fn create(&self, name: &str, description: &str, owner_id: Uuid) -> Result<Workspace> {
        let now = Utc::now();
        let workspace = Workspace {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
        };

        self.repo.create_with_owner(&workspace).await?;

        tracing::info!(workspace_id = %workspace.id, %owner_id, "workspace created");
        Ok(workspace)
    }

    pub async fn get(&self, workspace_id: Uuid, actor: Uuid) -> Result<Workspace> {
        self.authorize(workspace_id, actor, Access::Read).await?;
        self.find(workspace_id).await
    }

    pub async fn list_for_user(&self, actor: Uuid) -> Result<Vec<Workspace>> {
        self.repo.list_for_user(actor).await
    }

    pub async fn update(
        &self,
        workspace_id: Uuid,
        actor: Uuid,
        patch: WorkspacePatch,
    ) -> Result<Workspace> {
        self.authorize(workspace_id, actor, Access::Write).await?;

        let mut workspace = patch.apply(self.find(workspace_id).await?);
        workspace.updated_at = Utc::now();
        self.repo.update(&workspace).await?;

        Ok(workspace)
    }

    pub async fn delete(&self, workspace_id: Uuid, actor: Uuid) -> Result<()> {
        self.authorize(workspace_id, actor, Access::Own).await?;

        if !self.repo.delete(workspace_id).await? {
            return Err(WorkspaceError::NotFound("workspace"));
        }

        tracing::info!(%workspace_id, "workspace deleted");
        Ok(())
    }

    /// Admins may add members; only the owner may grant admin. Ownership
    /// is never granted here.
    pub async fn add_member(
        &self,
        workspace_id: Uuid,
        actor: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<()> {
        let actor_role = self.authorize(workspace_id, actor, Access::Write).await?;

        match role {
            Role::Owner => return Err(WorkspaceError::Forbidden),
            Role::Admin if actor_role != Role::Owner => return Err(WorkspaceError::Forbidden),
            _ => {}
        }

        self.repo.add_member(workspace_id, user_id, role).await?;

        tracing::info!(%workspace_id, %user_id, role = %role, "member added");
        Ok(())
    }

    pub async fn remove_member(&self, workspace_id: Uuid, actor: Uuid, user_id: Uuid) -> Result<()> {
        self.authorize(workspace_id, actor, Access::Write).await?;

        match self.repo.membership(workspace_id, user_id).await? {
            None => return Err(WorkspaceError::NotFound("member")),
            Some(Role::Owner) => return Err(WorkspaceError::Forbidden),
            Some(_) => {}
        }

        if self.repo.remove_member(workspace_id, user_id).await? == 0 {
            return Err(WorkspaceError::NotFound("member"));
        }

        tracing::info!(%workspace_id, %user_id, "member removed");
        Ok(())
    }

    pub async fn list_members(&self, workspace_id: Uuid, actor: Uuid) -> Result<Vec<Member>> {
        self.authorize(workspace_id, actor, Access::Read).await?;
        self.repo.list_members(workspace_id).await
    }

    async fn find(&self, workspace_id: Uuid) -> Result<Workspace> {
        self.repo
            .find(workspace_id)
            .await?
            .ok_or(WorkspaceError::NotFound("workspace"))
    }
}
