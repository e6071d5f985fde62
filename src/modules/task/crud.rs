use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, Pool};
use uuid::Uuid;

use super::interface::TaskRepository;
use super::model::{Assignee, Task, TaskPriority, TaskStatus};
use crate::modules::workspace::interface::{Result, WorkspaceError};

const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, priority, due_at, created_at, updated_at";

#[derive(Clone)]
pub struct TaskCrud {
    pool: Pool<MySql>,
}

impl TaskCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: String,
    status: String,
    priority: String,
    due_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = WorkspaceError;

    fn try_from(row: TaskRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            status: row.status.parse::<TaskStatus>().map_err(WorkspaceError::Internal)?,
            priority: row
                .priority
                .parse::<TaskPriority>()
                .map_err(WorkspaceError::Internal)?,
            due: row.due_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct AssigneeRow {
    user_id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl TaskRepository for TaskCrud {
    async fn insert(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, project_id, title, description, status, priority, due_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ? ORDER BY created_at ASC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, priority = ?, due_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due)
        .bind(task.updated_at)
        .bind(task.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn assign(&self, task_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO task_assignments (task_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(task_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    WorkspaceError::DuplicateEntry
                }
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    WorkspaceError::NotFound("user")
                }
                other => WorkspaceError::Database(other),
            })?;

        Ok(())
    }

    async fn unassign(&self, task_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM task_assignments WHERE task_id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_assigned(&self, task_id: Uuid, user_id: Uuid) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM task_assignments WHERE task_id = ? AND user_id = ?",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    async fn list_assignees(&self, task_id: Uuid) -> Result<Vec<Assignee>> {
        let rows = sqlx::query_as::<_, AssigneeRow>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, a.created_at
            FROM task_assignments a
            INNER JOIN users u ON u.id = a.user_id
            WHERE a.task_id = ?
            ORDER BY a.created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Assignee {
                user_id: row.user_id,
                name: row.name,
                email: row.email,
                assigned_at: row.created_at,
            })
            .collect())
    }
}
