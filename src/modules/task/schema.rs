use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::model::{Assignee, Task, TaskPatch, TaskPriority, TaskStatus};
use super::service::NewTask;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: String,
    pub priority: Option<TaskPriority>,
    pub due: Option<DateTime<Utc>>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            due: req.due,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due: Option<DateTime<Utc>>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due: req.due,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due: task.due,
            created_at: task.created_at,
            last_modified: task.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub task: TaskResponse,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub assigned_at: DateTime<Utc>,
}

impl From<Assignee> for AssigneeResponse {
    fn from(assignee: Assignee) -> Self {
        Self {
            user_id: assignee.user_id,
            name: assignee.name,
            email: assignee.email,
            assigned_at: assignee.assigned_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssigneeList {
    pub assignees: Vec<AssigneeResponse>,
}
