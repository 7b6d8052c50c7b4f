//! BOQ repository
//!
//! Database operations for bill-of-quantity line items.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sp_core::traits::Id;
use sp_models::{Boq, CreateBoqDto, UpdateBoqDto};
use sqlx::{FromRow, PgPool};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// BOQ database entity
#[derive(Debug, Clone, FromRow)]
pub struct BoqRow {
    pub id: i64,
    pub work_package_id: i64,
    pub boq_code: String,
    pub description: String,
    pub uom: String,
    pub budget_qty: f64,
    pub unit_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// BOQ row joined with its owners and entry count (management listing)
#[derive(Debug, Clone, FromRow)]
pub struct BoqWithCounts {
    pub id: i64,
    pub work_package_id: i64,
    pub boq_code: String,
    pub description: String,
    pub uom: String,
    pub budget_qty: f64,
    pub unit_rate: f64,
    pub wp_code: String,
    pub project_code: String,
    pub progress_entry_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BoqRow> for Boq {
    fn from(row: BoqRow) -> Self {
        Boq {
            id: Some(row.id),
            work_package_id: row.work_package_id,
            boq_code: row.boq_code,
            description: row.description,
            uom: row.uom,
            budget_qty: row.budget_qty,
            unit_rate: row.unit_rate,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// BOQ repository implementation
pub struct BoqRepository {
    pool: PgPool,
}

impl BoqRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find BOQs belonging to a work package
    pub async fn find_by_work_package(
        &self,
        work_package_id: Id,
    ) -> RepositoryResult<Vec<BoqRow>> {
        let rows = sqlx::query_as::<_, BoqRow>(
            r#"
            SELECT id, work_package_id, boq_code, description, uom,
                   budget_qty, unit_rate, created_at, updated_at
            FROM boqs
            WHERE work_package_id = $1
            ORDER BY boq_code ASC
            "#,
        )
        .bind(work_package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// List all BOQs with owner codes and progress-entry counts
    pub async fn find_all_with_counts(&self) -> RepositoryResult<Vec<BoqWithCounts>> {
        let rows = sqlx::query_as::<_, BoqWithCounts>(
            r#"
            SELECT b.id, b.work_package_id, b.boq_code, b.description, b.uom,
                   b.budget_qty, b.unit_rate,
                   wp.wp_code, p.project_code,
                   COUNT(pe.id) AS progress_entry_count,
                   b.created_at, b.updated_at
            FROM boqs b
            JOIN work_packages wp ON wp.id = b.work_package_id
            JOIN projects p ON p.id = wp.project_id
            LEFT JOIN progress_entries pe ON pe.boq_id = b.id
            GROUP BY b.id, wp.wp_code, p.project_code
            ORDER BY b.boq_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<BoqRow, CreateBoqDto, UpdateBoqDto> for BoqRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<BoqRow>> {
        let row = sqlx::query_as::<_, BoqRow>(
            r#"
            SELECT id, work_package_id, boq_code, description, uom,
                   budget_qty, unit_rate, created_at, updated_at
            FROM boqs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<BoqRow>> {
        let rows = sqlx::query_as::<_, BoqRow>(
            r#"
            SELECT id, work_package_id, boq_code, description, uom,
                   budget_qty, unit_rate, created_at, updated_at
            FROM boqs
            ORDER BY boq_code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM boqs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateBoqDto) -> RepositoryResult<BoqRow> {
        let wp_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM work_packages WHERE id = $1)",
        )
        .bind(dto.work_package_id)
        .fetch_one(&self.pool)
        .await?;
        if !wp_exists {
            return Err(RepositoryError::Validation(format!(
                "work_package_id {} does not reference an existing work package",
                dto.work_package_id
            )));
        }

        let row = sqlx::query_as::<_, BoqRow>(
            r#"
            INSERT INTO boqs (work_package_id, boq_code, description, uom,
                              budget_qty, unit_rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id, work_package_id, boq_code, description, uom,
                      budget_qty, unit_rate, created_at, updated_at
            "#,
        )
        .bind(dto.work_package_id)
        .bind(&dto.boq_code)
        .bind(&dto.description)
        .bind(&dto.uom)
        .bind(dto.budget_qty)
        .bind(dto.unit_rate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_create(e, "boq_code is already taken"))?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateBoqDto) -> RepositoryResult<BoqRow> {
        let row = sqlx::query_as::<_, BoqRow>(
            r#"
            UPDATE boqs SET
                work_package_id = COALESCE($1, work_package_id),
                boq_code = COALESCE($2, boq_code),
                description = COALESCE($3, description),
                uom = COALESCE($4, uom),
                budget_qty = COALESCE($5, budget_qty),
                unit_rate = COALESCE($6, unit_rate),
                updated_at = NOW()
            WHERE id = $7
            RETURNING id, work_package_id, boq_code, description, uom,
                      budget_qty, unit_rate, created_at, updated_at
            "#,
        )
        .bind(dto.work_package_id)
        .bind(&dto.boq_code)
        .bind(&dto.description)
        .bind(&dto.uom)
        .bind(dto.budget_qty)
        .bind(dto.unit_rate)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_create(e, "boq_code is already taken"))?
        .ok_or_else(|| RepositoryError::NotFound(format!("BOQ with id {} not found", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM boqs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "BOQ with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM boqs WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
