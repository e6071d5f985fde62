use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::interface::ProjectRepository;
use super::model::{Project, ProjectPatch, DEFAULT_STATUS};
use crate::modules::workspace::interface::{Result, WorkspaceError};
use crate::modules::workspace::{Access, Role, WorkspaceService};

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub status: Option<String>,
}

/// Workspace-scoped project CRUD, guarded by the caller's membership.
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
    workspaces: Arc<WorkspaceService>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>, workspaces: Arc<WorkspaceService>) -> Self {
        Self { repo, workspaces }
    }

    pub async fn create(&self, workspace_id: Uuid, actor: Uuid, input: NewProject) -> Result<Project> {
        self.workspaces
            .authorize(workspace_id, actor, Access::Write)
            .await?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            workspace_id,
            name: input.name,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            created_at: now,
            updated_at: now,
        };
        ensure_schedule(&project)?;

        self.repo.insert(&project).await?;

        tracing::info!(project_id = %project.id, %workspace_id, "project created");
        Ok(project)
    }

    pub async fn list(&self, workspace_id: Uuid, actor: Uuid) -> Result<Vec<Project>> {
        self.workspaces
            .authorize(workspace_id, actor, Access::Read)
            .await?;
        self.repo.list_for_workspace(workspace_id).await
    }

    pub async fn get(&self, id: Uuid, actor: Uuid) -> Result<Project> {
        let (project, _) = self.load_guarded(id, actor, Access::Read).await?;
        Ok(project)
    }

    pub async fn update(&self, id: Uuid, actor: Uuid, patch: ProjectPatch) -> Result<Project> {
        let (current, _) = self.load_guarded(id, actor, Access::Write).await?;

        let mut project = patch.apply(current);
        ensure_schedule(&project)?;
        project.updated_at = Utc::now();

        self.repo.update(&project).await?;
        Ok(project)
    }

    pub async fn delete(&self, id: Uuid, actor: Uuid) -> Result<()> {
        self.load_guarded(id, actor, Access::Write).await?;

        if !self.repo.delete(id).await? {
            return Err(WorkspaceError::NotFound("project"));
        }

        tracing::info!(project_id = %id, "project deleted");
        Ok(())
    }

    /// Loads a project and checks the caller's role in its workspace.
    /// Outsiders see the project as missing.
    pub async fn load_guarded(
        &self,
        id: Uuid,
        actor: Uuid,
        access: Access,
    ) -> Result<(Project, Role)> {
        let project = self
            .repo
            .find(id)
            .await?
            .ok_or(WorkspaceError::NotFound("project"))?;

        match self
            .workspaces
            .authorize(project.workspace_id, actor, access)
            .await
        {
            Ok(role) => Ok((project, role)),
            Err(WorkspaceError::NotFound(_)) => Err(WorkspaceError::NotFound("project")),
            Err(e) => Err(e),
        }
    }
}

fn ensure_schedule(project: &Project) -> Result<()> {
    if project.has_valid_schedule() {
        Ok(())
    } else {
        Err(WorkspaceError::InvalidInput(
            "end date must not be before start date".to_string(),
        ))
    }
}
