//! Progress Entry repository
//!
//! Progress entries are append-only: there is no update or delete. Creation
//! goes through the budget guard inside a single transaction so that two
//! concurrent writers against the same BOQ cannot both pass the check.

use chrono::{DateTime, NaiveDate, Utc};
use sp_core::traits::Id;
use sp_models::{CreateProgressEntryDto, ProgressEntry};
use sp_progress::guard;
use sqlx::{FromRow, PgPool};

use crate::repository::{RepositoryError, RepositoryResult};

/// Progress entry database entity
#[derive(Debug, Clone, FromRow)]
pub struct ProgressEntryRow {
    pub id: i64,
    pub boq_id: i64,
    pub progress_date: NaiveDate,
    pub actual_qty: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProgressEntryRow> for ProgressEntry {
    fn from(row: ProgressEntryRow) -> Self {
        ProgressEntry {
            id: Some(row.id),
            boq_id: row.boq_id,
            progress_date: row.progress_date,
            actual_qty: row.actual_qty,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Progress entry repository implementation
pub struct ProgressEntryRepository {
    pool: PgPool,
}

impl ProgressEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find all entries for a BOQ, ascending by date with insertion order
    /// preserved on ties (the order the history builder expects).
    pub async fn find_by_boq(&self, boq_id: Id) -> RepositoryResult<Vec<ProgressEntryRow>> {
        let rows = sqlx::query_as::<_, ProgressEntryRow>(
            r#"
            SELECT id, boq_id, progress_date, actual_qty, created_at, updated_at
            FROM progress_entries
            WHERE boq_id = $1
            ORDER BY progress_date ASC, id ASC
            "#,
        )
        .bind(boq_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Raw remaining budget for a BOQ: budget_qty minus the unclamped entry sum.
    pub async fn remaining_budget(&self, boq_id: Id) -> RepositoryResult<f64> {
        let row = sqlx::query_as::<_, (f64, f64)>(
            r#"
            SELECT b.budget_qty,
                   COALESCE(SUM(pe.actual_qty), 0) AS current_progress
            FROM boqs b
            LEFT JOIN progress_entries pe ON pe.boq_id = b.id
            WHERE b.id = $1
            GROUP BY b.id
            "#,
        )
        .bind(boq_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("BOQ with id {} not found", boq_id)))?;

        Ok(row.0 - row.1)
    }

    /// Create an entry behind the budget guard.
    ///
    /// The whole sequence runs in one transaction with a row lock on the BOQ:
    /// lock, recompute the raw recorded total, check the proposed quantity
    /// against the remaining budget, insert. Concurrent writers for the same
    /// BOQ serialize on the lock, so the check always sees the latest total.
    pub async fn create_guarded(
        &self,
        dto: &CreateProgressEntryDto,
    ) -> RepositoryResult<ProgressEntryRow> {
        let mut tx = self.pool.begin().await?;

        let budget_qty = sqlx::query_scalar::<_, f64>(
            "SELECT budget_qty FROM boqs WHERE id = $1 FOR UPDATE",
        )
        .bind(dto.boq_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            RepositoryError::Validation(format!(
                "boq_id {} does not reference an existing BOQ",
                dto.boq_id
            ))
        })?;

        let current_progress = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(actual_qty), 0) FROM progress_entries WHERE boq_id = $1",
        )
        .bind(dto.boq_id)
        .fetch_one(&mut *tx)
        .await?;

        let remaining = budget_qty - current_progress;
        if guard::check_proposed_qty(dto.actual_qty, remaining).is_err() {
            tracing::debug!(
                boq_id = dto.boq_id,
                proposed = dto.actual_qty,
                remaining,
                "progress entry rejected by budget guard"
            );
            return Err(RepositoryError::BudgetExceeded { remaining });
        }

        let row = sqlx::query_as::<_, ProgressEntryRow>(
            r#"
            INSERT INTO progress_entries (boq_id, progress_date, actual_qty, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, boq_id, progress_date, actual_qty, created_at, updated_at
            "#,
        )
        .bind(dto.boq_id)
        .bind(dto.progress_date)
        .bind(dto.actual_qty)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row)
    }

    pub async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM progress_entries")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
