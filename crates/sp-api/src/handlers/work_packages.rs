//! Work Package API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sp_core::traits::Id;
use sp_db::{Repository, WorkPackageRepository};
use sp_models::{CreateWorkPackageDto, UpdateWorkPackageDto};
use validator::Validate;

use crate::error::{repo_error, ApiError, ApiResult};
use crate::extractors::AppState;
use crate::handlers::projects::Collection;

/// GET /api/v1/work_packages
pub async fn list_work_packages(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = WorkPackageRepository::new(pool.clone());

    let rows = repo
        .find_all_with_counts()
        .await
        .map_err(|e| repo_error("WorkPackage", e))?;

    let elements: Vec<WorkPackageResponse> = rows
        .into_iter()
        .map(|row| WorkPackageResponse {
            type_name: "WorkPackage".into(),
            id: row.id,
            project_id: row.project_id,
            wp_code: row.wp_code,
            wp_name: row.wp_name,
            discipline_code: row.discipline_code,
            project_code: Some(row.project_code),
            project_name: Some(row.project_name),
            boq_count: Some(row.boq_count),
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(Collection::of(elements)))
}

/// GET /api/v1/work_packages/:id
pub async fn get_work_package(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = WorkPackageRepository::new(pool.clone());

    let row = repo
        .find_by_id(id)
        .await
        .map_err(|e| repo_error("WorkPackage", e))?
        .ok_or_else(|| ApiError::not_found("WorkPackage", id))?;

    Ok(Json(WorkPackageResponse::from_row(row)))
}

/// POST /api/v1/work_packages
pub async fn create_work_package(
    State(state): State<AppState>,
    Json(dto): Json<CreateWorkPackageDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = WorkPackageRepository::new(pool.clone());

    let row = repo
        .create(dto)
        .await
        .map_err(|e| repo_error("WorkPackage", e))?;

    Ok((StatusCode::CREATED, Json(WorkPackageResponse::from_row(row))))
}

/// PATCH /api/v1/work_packages/:id
pub async fn update_work_package(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateWorkPackageDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = WorkPackageRepository::new(pool.clone());

    let row = repo
        .update(id, dto)
        .await
        .map_err(|e| repo_error("WorkPackage", e))?;

    Ok(Json(WorkPackageResponse::from_row(row)))
}

/// DELETE /api/v1/work_packages/:id
pub async fn delete_work_package(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = WorkPackageRepository::new(pool.clone());

    repo.delete(id)
        .await
        .map_err(|e| repo_error("WorkPackage", e))?;

    Ok(StatusCode::NO_CONTENT)
}

// DTOs

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkPackageResponse {
    #[serde(rename = "_type")]
    type_name: String,
    id: Id,
    project_id: Id,
    wp_code: String,
    wp_name: String,
    discipline_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boq_count: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl WorkPackageResponse {
    fn from_row(row: sp_db::WorkPackageRow) -> Self {
        Self {
            type_name: "WorkPackage".into(),
            id: row.id,
            project_id: row.project_id,
            wp_code: row.wp_code,
            wp_name: row.wp_name,
            discipline_code: row.discipline_code,
            project_code: None,
            project_name: None,
            boq_count: None,
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        }
    }
}
