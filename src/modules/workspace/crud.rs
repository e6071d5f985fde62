use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql, Pool};
use uuid::Uuid;

use super::interface::{Result, WorkspaceError, WorkspaceRepository};
use super::model::{Member, Role, Workspace};

const WORKSPACE_COLUMNS: &str = "w.id, w.name, w.description, w.owner_id, w.created_at, w.updated_at";

#[derive(Clone)]
pub struct WorkspaceCrud {
    pool: Pool<MySql>,
}

impl WorkspaceCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MemberRow {
    user_id: Uuid,
    name: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

/// Membership writes reference both a workspace and a user. A missing user
/// surfaces as a foreign key violation.
fn map_member_write_error(e: sqlx::Error) -> WorkspaceError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            WorkspaceError::DuplicateEntry
        }
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            WorkspaceError::NotFound("user")
        }
        other => WorkspaceError::Database(other),
    }
}

fn parse_role(raw: &str) -> Result<Role> {
    raw.parse::<Role>().map_err(WorkspaceError::Internal)
}

#[async_trait]
impl WorkspaceRepository for WorkspaceCrud {
    async fn create_with_owner(&self, workspace: &Workspace) -> Result<()> {
        // Dropping `tx` without commit rolls both inserts back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO workspaces (id, name, description, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(workspace.id)
        .bind(&workspace.name)
        .bind(&workspace.description)
        .bind(workspace.owner_id)
        .bind(workspace.created_at)
        .bind(workspace.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_member_write_error)?;

        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(workspace.id)
        .bind(workspace.owner_id)
        .bind(Role::Owner.as_str())
        .bind(workspace.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_member_write_error)?;

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Workspace>> {
        let workspace = sqlx::query_as::<_, Workspace>(&format!(
            "SELECT {WORKSPACE_COLUMNS} FROM workspaces w WHERE w.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(workspace)
    }

    async fn update(&self, workspace: &Workspace) -> Result<()> {
        sqlx::query("UPDATE workspaces SET name = ?, description = ?, updated_at = ? WHERE id = ?")
            .bind(&workspace.name)
            .bind(&workspace.description)
            .bind(workspace.updated_at)
            .bind(workspace.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Workspace>> {
        let workspaces = sqlx::query_as::<_, Workspace>(&format!(
            r#"
            SELECT {WORKSPACE_COLUMNS}
            FROM workspaces w
            INNER JOIN workspace_members m ON m.workspace_id = w.id
            WHERE m.user_id = ?
            ORDER BY w.created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(workspaces)
    }

    async fn membership(&self, workspace_id: Uuid, user_id: Uuid) -> Result<Option<Role>> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM workspace_members WHERE workspace_id = ? AND user_id = ?",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        role.as_deref().map(parse_role).transpose()
    }

    async fn add_member(&self, workspace_id: Uuid, user_id: Uuid, role: Role) -> Result<()> {
        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(workspace_id)
        .bind(user_id)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_member_write_error)?;

        Ok(())
    }

    async fn remove_member(&self, workspace_id: Uuid, user_id: Uuid) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM workspace_members WHERE workspace_id = ? AND user_id = ? AND role <> 'owner'",
        )
        .bind(workspace_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed > 0 {
            // A former member keeps no task assignments in this workspace.
            sqlx::query(
                r#"
                DELETE a FROM task_assignments a
                INNER JOIN tasks t ON t.id = a.task_id
                INNER JOIN projects p ON p.id = t.project_id
                WHERE p.workspace_id = ? AND a.user_id = ?
                "#,
            )
            .bind(workspace_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn list_members(&self, workspace_id: Uuid) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.user_id, u.name, u.email, m.role, m.created_at
            FROM workspace_members m
            INNER JOIN users u ON u.id = m.user_id
            WHERE m.workspace_id = ?
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Member {
                    user_id: row.user_id,
                    name: row.name,
                    email: row.email,
                    role: parse_role(&row.role)?,
                    joined_at: row.created_at,
                })
            })
            .collect()
    }
}
