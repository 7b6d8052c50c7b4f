//! Project repository
//!
//! Database operations for projects.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sp_core::traits::Id;
use sp_models::{CreateProjectDto, Project, UpdateProjectDto};
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// Project database entity
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub project_code: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project row with its work-package count (management listing)
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithCounts {
    pub id: i64,
    pub project_code: String,
    pub project_name: String,
    pub work_package_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: Some(row.id),
            project_code: row.project_code,
            project_name: row.project_name,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Project repository implementation
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all projects with their work-package counts
    pub async fn find_all_with_counts(&self) -> RepositoryResult<Vec<ProjectWithCounts>> {
        let rows = sqlx::query_as::<_, ProjectWithCounts>(
            r#"
            SELECT p.id, p.project_code, p.project_name,
                   COUNT(wp.id) AS work_package_count,
                   p.created_at, p.updated_at
            FROM projects p
            LEFT JOIN work_packages wp ON wp.project_id = p.id
            GROUP BY p.id
            ORDER BY p.project_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<ProjectRow, CreateProjectDto, UpdateProjectDto> for ProjectRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, project_code, project_name, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, project_code, project_name, created_at, updated_at
            FROM projects
            ORDER BY project_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateProjectDto) -> RepositoryResult<ProjectRow> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (project_code, project_name, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, project_code, project_name, created_at, updated_at
            "#,
        )
        .bind(&dto.project_code)
        .bind(&dto.project_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_create(e, "project_code is already taken"))?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateProjectDto) -> RepositoryResult<ProjectRow> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects SET
                project_code = COALESCE($1, project_code),
                project_name = COALESCE($2, project_name),
                updated_at = NOW()
            WHERE id = $3
            RETURNING id, project_code, project_name, created_at, updated_at
            "#,
        )
        .bind(&dto.project_code)
        .bind(&dto.project_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_create(e, "project_code is already taken"))?
        .ok_or_else(|| RepositoryError::NotFound(format!("Project with id {} not found", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Project with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
