//! Progress Entry API handlers
//!
//! Entries are append-only; creation runs behind the transactional budget
//! guard and a rejection comes back as 422 with the remaining budget.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use sp_core::traits::Id;
use sp_db::ProgressEntryRepository;
use sp_models::CreateProgressEntryDto;
use validator::Validate;

use crate::error::{repo_error, ApiError, ApiResult};
use crate::extractors::AppState;

/// POST /api/v1/progress_entries
pub async fn create_progress_entry(
    State(state): State<AppState>,
    Json(dto): Json<CreateProgressEntryDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = ProgressEntryRepository::new(pool.clone());

    let row = repo
        .create_guarded(&dto)
        .await
        .map_err(|e| repo_error("ProgressEntry", e))?;

    tracing::info!(
        entry_id = row.id,
        boq_id = row.boq_id,
        actual_qty = row.actual_qty,
        "progress entry recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ProgressEntryResponse {
            type_name: "ProgressEntry".into(),
            id: row.id,
            boq_id: row.boq_id,
            progress_date: row.progress_date.to_string(),
            actual_qty: row.actual_qty,
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        }),
    ))
}

// DTOs

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressEntryResponse {
    #[serde(rename = "_type")]
    type_name: String,
    id: Id,
    boq_id: Id,
    progress_date: String,
    actual_qty: f64,
    created_at: String,
    updated_at: String,
}
