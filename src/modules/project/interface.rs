use async_trait::async_trait;
use uuid::Uuid;

use super::model::Project;
use crate::modules::workspace::interface::Result;

/// Plain project persistence. Authorization happens in the service.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: &Project) -> Result<()>;
    async fn find(&self, id: Uuid) -> Result<Option<Project>>;
    async fn list_for_workspace(&self, workspace_id: Uuid) -> Result<Vec<Project>>;
    async fn update(&self, project: &Project) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
