//! Work Package repository
//!
//! Database operations for work packages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sp_core::traits::Id;
use sp_models::{CreateWorkPackageDto, UpdateWorkPackageDto, WorkPackage};
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// Work package database entity
#[derive(Debug, Clone, FromRow)]
pub struct WorkPackageRow {
    pub id: i64,
    pub project_id: i64,
    pub wp_code: String,
    pub wp_name: String,
    pub discipline_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Work package row joined with its project and BOQ count (management listing)
#[derive(Debug, Clone, FromRow)]
pub struct WorkPackageWithCounts {
    pub id: i64,
    pub project_id: i64,
    pub wp_code: String,
    pub wp_name: String,
    pub discipline_code: String,
    pub project_code: String,
    pub project_name: String,
    pub boq_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkPackageRow> for WorkPackage {
    fn from(row: WorkPackageRow) -> Self {
        WorkPackage {
            id: Some(row.id),
            project_id: row.project_id,
            wp_code: row.wp_code,
            wp_name: row.wp_name,
            discipline_code: row.discipline_code,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Work package repository implementation
pub struct WorkPackageRepository {
    pool: PgPool,
}

impl WorkPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find work packages belonging to a project
    pub async fn find_by_project(&self, project_id: Id) -> RepositoryResult<Vec<WorkPackageRow>> {
        let rows = sqlx::query_as::<_, WorkPackageRow>(
            r#"
            SELECT id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
            FROM work_packages
            WHERE project_id = $1
            ORDER BY wp_code ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// List all work packages with owning project and BOQ counts
    pub async fn find_all_with_counts(&self) -> RepositoryResult<Vec<WorkPackageWithCounts>> {
        let rows = sqlx::query_as::<_, WorkPackageWithCounts>(
            r#"
            SELECT wp.id, wp.project_id, wp.wp_code, wp.wp_name, wp.discipline_code,
                   p.project_code, p.project_name,
                   COUNT(b.id) AS boq_count,
                   wp.created_at, wp.updated_at
            FROM work_packages wp
            JOIN projects p ON p.id = wp.project_id
            LEFT JOIN boqs b ON b.work_package_id = wp.id
            GROUP BY wp.id, p.project_code, p.project_name
            ORDER BY wp.wp_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<WorkPackageRow, CreateWorkPackageDto, UpdateWorkPackageDto>
    for WorkPackageRepository
{
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<WorkPackageRow>> {
        let row = sqlx::query_as::<_, WorkPackageRow>(
            r#"
            SELECT id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
            FROM work_packages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<WorkPackageRow>> {
        let rows = sqlx::query_as::<_, WorkPackageRow>(
            r#"
            SELECT id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
            FROM work_packages
            ORDER BY wp_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM work_packages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateWorkPackageDto) -> RepositoryResult<WorkPackageRow> {
        let project_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(dto.project_id)
                .fetch_one(&self.pool)
                .await?;
        if !project_exists {
            return Err(RepositoryError::Validation(format!(
                "project_id {} does not reference an existing project",
                dto.project_id
            )));
        }

        let row = sqlx::query_as::<_, WorkPackageRow>(
            r#"
            INSERT INTO work_packages (project_id, wp_code, wp_name, discipline_code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
            "#,
        )
        .bind(dto.project_id)
        .bind(&dto.wp_code)
        .bind(&dto.wp_name)
        .bind(&dto.discipline_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_create(e, "wp_code is already taken"))?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateWorkPackageDto) -> RepositoryResult<WorkPackageRow> {
        let row = sqlx::query_as::<_, WorkPackageRow>(
            r#"
            UPDATE work_packages SET
                project_id = COALESCE($1, project_id),
                wp_code = COALESCE($2, wp_code),
                wp_name = COALESCE($3, wp_name),
                discipline_code = COALESCE($4, discipline_code),
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
            "#,
        )
        .bind(dto.project_id)
        .bind(&dto.wp_code)
        .bind(&dto.wp_name)
        .bind(&dto.discipline_code)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_create(e, "wp_code is already taken"))?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("Work package with id {} not found", id))
        })?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM work_packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Work package with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM work_packages WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
