// src/project/store.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::types::{NewProject, Project, ProjectId, ProjectOwner, ProjectState};

/// Data access used by the project service. Every call is a single read or
/// write against the backing store; nothing is cached.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>>;

    /// All projects in `state`, ordered by id.
    async fn find_projects_by_state(&self, state: &ProjectState) -> Result<Vec<Project>>;

    /// The subset of `ids` whose state is `state`, ordered by id.
    async fn find_projects_in_state(
        &self,
        ids: &[ProjectId],
        state: &ProjectState,
    ) -> Result<Vec<Project>>;

    async fn create_project(&self, new_project: &NewProject) -> Result<Project>;

    async fn delete_project(&self, id: ProjectId) -> Result<bool>;

    async fn count_comments(&self, project_id: ProjectId) -> Result<i64>;

    async fn count_owners(&self, project_id: ProjectId) -> Result<i64>;

    async fn count_tasks(&self, project_id: ProjectId) -> Result<i64>;

    async fn find_owners_by_project(&self, project_id: ProjectId) -> Result<Vec<ProjectOwner>>;

    async fn find_owners_by_user(&self, user_id: &str) -> Result<Vec<ProjectOwner>>;

    async fn create_owner(&self, project_id: ProjectId, user_id: &str) -> Result<ProjectOwner>;

    async fn count_likes(&self, project_id: ProjectId) -> Result<i64>;

    async fn has_liked(&self, project_id: ProjectId, user_id: &str) -> Result<bool>;

    /// Idempotent: liking twice leaves a single like.
    async fn add_like(&self, project_id: ProjectId, user_id: &str) -> Result<()>;

    async fn remove_like(&self, project_id: ProjectId, user_id: &str) -> Result<bool>;
}

const PROJECT_COLUMNS: &str = "id, title, description, state, created_at, updated_at";

pub struct SqliteProjectStore {
    pub pool: SqlitePool,
}

impl SqliteProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_project(&self, row: SqliteRow) -> Result<Project> {
        let state: String = row.try_get("state")?;
        Ok(Project {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            state: ProjectState::from(state),
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    async fn count_where_project(&self, table: &str, project_id: ProjectId) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE project_id = ?");
        let count: (i64,) = sqlx::query_as(&sql)
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectStore {
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_project(row)?)),
            None => Ok(None),
        }
    }

    async fn find_projects_by_state(&self, state: &ProjectState) -> Result<Vec<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE state = ? ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(state.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| self.row_to_project(row))
            .collect()
    }

    async fn find_projects_in_state(
        &self,
        ids: &[ProjectId],
        state: &ProjectState,
    ) -> Result<Vec<Project>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE state = "));
        builder.push_bind(state.as_str());
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        debug!(candidates = ids.len(), state = %state, "Fetching projects by id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| self.row_to_project(row))
            .collect()
    }

    async fn create_project(&self, new_project: &NewProject) -> Result<Project> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO projects (title, description, state, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_project.title)
        .bind(&new_project.description)
        .bind(new_project.state.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id: result.last_insert_rowid(),
            title: new_project.title.clone(),
            description: new_project.description.clone(),
            state: new_project.state.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_comments(&self, project_id: ProjectId) -> Result<i64> {
        self.count_where_project("comments", project_id).await
    }

    async fn count_owners(&self, project_id: ProjectId) -> Result<i64> {
        self.count_where_project("project_owners", project_id).await
    }

    async fn count_tasks(&self, project_id: ProjectId) -> Result<i64> {
        self.count_where_project("tasks", project_id).await
    }

    async fn find_owners_by_project(&self, project_id: ProjectId) -> Result<Vec<ProjectOwner>> {
        let owners = sqlx::query_as::<_, ProjectOwner>(
            "SELECT id, project_id, user_id, created_at FROM project_owners WHERE project_id = ? ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(owners)
    }

    async fn find_owners_by_user(&self, user_id: &str) -> Result<Vec<ProjectOwner>> {
        let owners = sqlx::query_as::<_, ProjectOwner>(
            "SELECT id, project_id, user_id, created_at FROM project_owners WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(owners)
    }

    async fn create_owner(&self, project_id: ProjectId, user_id: &str) -> Result<ProjectOwner> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO project_owners (project_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ProjectOwner {
            id: result.last_insert_rowid(),
            project_id,
            user_id: user_id.to_string(),
            created_at: now,
        })
    }

    async fn count_likes(&self, project_id: ProjectId) -> Result<i64> {
        self.count_where_project("likes", project_id).await
    }

    async fn has_liked(&self, project_id: ProjectId, user_id: &str) -> Result<bool> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM likes WHERE project_id = ? AND user_id = ?")
                .bind(project_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 > 0)
    }

    async fn add_like(&self, project_id: ProjectId, user_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO likes (project_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_like(&self, project_id: ProjectId, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE project_id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
