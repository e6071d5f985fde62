use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::interface::TaskRepository;
use super::model::{Assignee, Task, TaskPatch, TaskPriority, TaskStatus};
use crate::modules::project::ProjectService;
use crate::modules::workspace::interface::{Result, WorkspaceError};
use crate::modules::workspace::{Access, Role, WorkspaceService};

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Option<TaskPriority>,
    pub due: Option<DateTime<Utc>>,
}

/// Tasks inside projects, plus who is assigned to them. Access follows the
/// caller's role in the owning workspace.
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    projects: Arc<ProjectService>,
    workspaces: Arc<WorkspaceService>,
}

impl TaskService {
    pub fn new(
        repo: Arc<dyn TaskRepository>,
        projects: Arc<ProjectService>,
        workspaces: Arc<WorkspaceService>,
    ) -> Self {
        Self {
            repo,
            projects,
            workspaces,
        }
    }

    pub async fn create(&self, project_id: Uuid, actor: Uuid, input: NewTask) -> Result<Task> {
        self.projects
            .load_guarded(project_id, actor, Access::Write)
            .await?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            project_id,
            title: input.title,
            description: input.description,
            status: TaskStatus::Todo,
            priority: input.priority.unwrap_or_default(),
            due: input.due,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&task).await?;

        tracing::info!(task_id = %task.id, %project_id, "task created");
        Ok(task)
    }

    pub async fn list(&self, project_id: Uuid, actor: Uuid) -> Result<Vec<Task>> {
        self.projects
            .load_guarded(project_id, actor, Access::Read)
            .await?;
        self.repo.list_for_project(project_id).await
    }

    pub async fn get(&self, id: Uuid, actor: Uuid) -> Result<Task> {
        let (task, _, _) = self.load_guarded(id, actor, Access::Read).await?;
        Ok(task)
    }

    /// Owners and admins may change anything. An assignee without write
    /// access may only move the task's status.
    pub async fn update(&self, id: Uuid, actor: Uuid, patch: TaskPatch) -> Result<Task> {
        let (current, _, role) = self.load_guarded(id, actor, Access::Read).await?;

        if !role.permits(Access::Write)
            && !(patch.is_status_only() && self.repo.is_assigned(id, actor).await?)
        {
            return Err(WorkspaceError::Forbidden);
        }

        let mut task = patch.apply(current);
        task.updated_at = Utc::now();
        self.repo.update(&task).await?;

        Ok(task)
    }

    pub async fn delete(&self, id: Uuid, actor: Uuid) -> Result<()> {
        self.load_guarded(id, actor, Access::Write).await?;

        if !self.repo.delete(id).await? {
            return Err(WorkspaceError::NotFound("task"));
        }

        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Assignees must belong to the task's workspace.
    pub async fn assign(&self, id: Uuid, actor: Uuid, user_id: Uuid) -> Result<()> {
        let (_, workspace_id, _) = self.load_guarded(id, actor, Access::Write).await?;

        if self.workspaces.role_of(workspace_id, user_id).await?.is_none() {
            return Err(WorkspaceError::InvalidInput(
                "assignee must be a member of the workspace".to_string(),
            ));
        }

        self.repo.assign(id, user_id).await?;

        tracing::info!(task_id = %id, %user_id, "task assigned");
        Ok(())
    }

    pub async fn unassign(&self, id: Uuid, actor: Uuid, user_id: Uuid) -> Result<()> {
        self.load_guarded(id, actor, Access::Write).await?;

        if !self.repo.unassign(id, user_id).await? {
            return Err(WorkspaceError::NotFound("assignment"));
        }

        tracing::info!(task_id = %id, %user_id, "task unassigned");
        Ok(())
    }

    pub async fn list_assignees(&self, id: Uuid, actor: Uuid) -> Result<Vec<Assignee>> {
        self.load_guarded(id, actor, Access::Read).await?;
        self.repo.list_assignees(id).await
    }

    /// Resolves task, workspace and the caller's role. Outsiders see the
    /// task as missing.
    async fn load_guarded(&self, id: Uuid, actor: Uuid, access: Access) -> Result<(Task, Uuid, Role)> {
        let task = self
            .repo
            .find(id)
            .await?
            .ok_or(WorkspaceError::NotFound("task"))?;

        match self.projects.load_guarded(task.project_id, actor, access).await {
            Ok((project, role)) => Ok((task, project.workspace_id, role)),
            Err(WorkspaceError::NotFound(_)) => Err(WorkspaceError::NotFound("task")),
            Err(e) => Err(e),
        }
    }
}
