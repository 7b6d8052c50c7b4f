//! BOQ API handlers
//!
//! CRUD for line items plus the two per-BOQ read views: remaining budget
//! (for entry forms) and cumulative history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sp_core::traits::Id;
use sp_db::{BoqRepository, ProgressEntryRepository, Repository};
use sp_models::{CreateBoqDto, ProgressEntry, UpdateBoqDto};
use sp_progress::{cumulative_history, latest_first, HistoryPoint};
use validator::Validate;

use crate::error::{repo_error, ApiError, ApiResult};
use crate::extractors::AppState;
use crate::handlers::projects::Collection;

/// GET /api/v1/boqs
pub async fn list_boqs(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = BoqRepository::new(pool.clone());

    let rows = repo
        .find_all_with_counts()
        .await
        .map_err(|e| repo_error("Boq", e))?;

    let elements: Vec<BoqResponse> = rows
        .into_iter()
        .map(|row| BoqResponse {
            type_name: "Boq".into(),
            id: row.id,
            work_package_id: row.work_package_id,
            boq_code: row.boq_code,
            description: row.description,
            uom: row.uom,
            budget_qty: row.budget_qty,
            unit_rate: row.unit_rate,
            amount: row.budget_qty * row.unit_rate,
            wp_code: Some(row.wp_code),
            project_code: Some(row.project_code),
            progress_entry_count: Some(row.progress_entry_count),
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(Collection::of(elements)))
}

/// GET /api/v1/boqs/:id
pub async fn get_boq(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = BoqRepository::new(pool.clone());

    let row = repo
        .find_by_id(id)
        .await
        .map_err(|e| repo_error("Boq", e))?
        .ok_or_else(|| ApiError::not_found("Boq", id))?;

    Ok(Json(BoqResponse::from_row(row)))
}

/// GET /api/v1/boqs/:id/remaining_budget
///
/// Raw remaining budget (budget minus unclamped entry sum). Entry forms use
/// this to show what the guard will still accept.
pub async fn get_remaining_budget(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let entries = ProgressEntryRepository::new(pool.clone());

    let remaining = entries
        .remaining_budget(id)
        .await
        .map_err(|e| repo_error("Boq", e))?;

    Ok(Json(RemainingBudgetResponse {
        type_name: "RemainingBudget".into(),
        boq_id: id,
        remaining_budget: remaining,
    }))
}

/// GET /api/v1/boqs/:id/history
///
/// The BOQ's static fields plus its cumulative progress sequence, ascending
/// by date, and the same points reversed for latest-first display.
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let boqs = BoqRepository::new(pool.clone());
    let entries_repo = ProgressEntryRepository::new(pool.clone());

    let boq = boqs
        .find_by_id(id)
        .await
        .map_err(|e| repo_error("Boq", e))?
        .ok_or_else(|| ApiError::not_found("Boq", id))?;

    let entries: Vec<ProgressEntry> = entries_repo
        .find_by_boq(id)
        .await
        .map_err(|e| repo_error("Boq", e))?
        .into_iter()
        .map(Into::into)
        .collect();

    let ascending = cumulative_history(boq.budget_qty, &entries);
    let descending = latest_first(ascending.clone());

    Ok(Json(HistoryResponse {
        type_name: "ProgressHistory".into(),
        boq: BoqResponse::from_row(boq),
        entries: ascending,
        entries_latest_first: descending,
    }))
}

/// POST /api/v1/boqs
pub async fn create_boq(
    State(state): State<AppState>,
    Json(dto): Json<CreateBoqDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = BoqRepository::new(pool.clone());

    let row = repo.create(dto).await.map_err(|e| repo_error("Boq", e))?;

    Ok((StatusCode::CREATED, Json(BoqResponse::from_row(row))))
}

/// PATCH /api/v1/boqs/:id
///
/// Reducing budget_qty below already-recorded totals is allowed; the read
/// path clamps and flags the drift rather than rejecting here.
pub async fn update_boq(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateBoqDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = BoqRepository::new(pool.clone());

    let row = repo.update(id, dto).await.map_err(|e| repo_error("Boq", e))?;

    Ok(Json(BoqResponse::from_row(row)))
}

/// DELETE /api/v1/boqs/:id
pub async fn delete_boq(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = BoqRepository::new(pool.clone());

    repo.delete(id).await.map_err(|e| repo_error("Boq", e))?;

    Ok(StatusCode::NO_CONTENT)
}

// DTOs

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoqResponse {
    #[serde(rename = "_type")]
    type_name: String,
    id: Id,
    work_package_id: Id,
    boq_code: String,
    description: String,
    uom: String,
    budget_qty: f64,
    unit_rate: f64,
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    wp_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress_entry_count: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl BoqResponse {
    fn from_row(row: sp_db::BoqRow) -> Self {
        Self {
            type_name: "Boq".into(),
            id: row.id,
            work_package_id: row.work_package_id,
            boq_code: row.boq_code,
            description: row.description,
            uom: row.uom,
            budget_qty: row.budget_qty,
            unit_rate: row.unit_rate,
            amount: row.budget_qty * row.unit_rate,
            wp_code: None,
            project_code: None,
            progress_entry_count: None,
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemainingBudgetResponse {
    #[serde(rename = "_type")]
    type_name: String,
    boq_id: Id,
    remaining_budget: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    #[serde(rename = "_type")]
    type_name: String,
    boq: BoqResponse,
    entries: Vec<HistoryPoint>,
    entries_latest_first: Vec<HistoryPoint>,
}
