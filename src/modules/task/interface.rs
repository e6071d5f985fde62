use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Assignee, Task};
use crate::modules::workspace::interface::Result;

/// Task and assignment persistence. Authorization happens in the service.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: &Task) -> Result<()>;
    async fn find(&self, id: Uuid) -> Result<Option<Task>>;
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>>;
    async fn update(&self, task: &Task) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Fails with `DuplicateEntry` if the user is already assigned.
    async fn assign(&self, task_id: Uuid, user_id: Uuid) -> Result<()>;
    async fn unassign(&self, task_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn is_assigned(&self, task_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn list_assignees(&self, task_id: Uuid) -> Result<Vec<Assignee>>;
}
