use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// A project may not end before it starts.
    pub fn has_valid_schedule(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => end >= start,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ProjectPatch {
    pub fn apply(&self, mut project: Project) -> Project {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(start) = self.start_date {
            project.start_date = Some(start);
        }
        if let Some(end) = self.end_date {
            project.end_date = Some(end);
        }
        if let Some(status) = &self.status {
            project.status = status.clone();
        }
        project
    }
}
