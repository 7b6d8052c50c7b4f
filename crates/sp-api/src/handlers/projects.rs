//! Project API handlers
//!
//! CRUD plus the aggregated dashboard read path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use sp_core::traits::Id;
use sp_db::{GraphLoader, ProjectRepository, Repository};
use sp_models::{CreateProjectDto, UpdateProjectDto};
use sp_progress::{aggregate_all, aggregate_project, ProjectSummary};
use validator::Validate;

use crate::error::{repo_error, ApiError, ApiResult};
use crate::extractors::AppState;

/// GET /api/v1/projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    let rows = repo
        .find_all_with_counts()
        .await
        .map_err(|e| repo_error("Project", e))?;

    let elements: Vec<ProjectResponse> = rows
        .into_iter()
        .map(|row| ProjectResponse {
            type_name: "Project".into(),
            id: row.id,
            project_code: row.project_code,
            project_name: row.project_name,
            work_package_count: Some(row.work_package_count),
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(Collection::of(elements)))
}

/// GET /api/v1/projects/dashboard
///
/// The full graph load plus cost-weighted aggregation for every project.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let loader = GraphLoader::new(pool.clone());

    let graph = loader.load_all().await.map_err(|e| repo_error("Project", e))?;
    let summaries: Vec<ProjectSummary> = aggregate_all(&graph);

    Ok(Json(Collection::of(summaries)))
}

/// GET /api/v1/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    let row = repo
        .find_by_id(id)
        .await
        .map_err(|e| repo_error("Project", e))?
        .ok_or_else(|| ApiError::not_found("Project", id))?;

    Ok(Json(ProjectResponse {
        type_name: "Project".into(),
        id: row.id,
        project_code: row.project_code,
        project_name: row.project_name,
        work_package_count: None,
        created_at: row.created_at.to_rfc3339(),
        updated_at: row.updated_at.to_rfc3339(),
    }))
}

/// GET /api/v1/projects/:id/progress
///
/// One project's subtree, aggregated.
pub async fn get_project_progress(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let loader = GraphLoader::new(pool.clone());

    let node = loader
        .load_project(id)
        .await
        .map_err(|e| repo_error("Project", e))?
        .ok_or_else(|| ApiError::not_found("Project", id))?;

    Ok(Json(aggregate_project(&node)))
}

/// POST /api/v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(dto): Json<CreateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    let row = repo.create(dto).await.map_err(|e| repo_error("Project", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            type_name: "Project".into(),
            id: row.id,
            project_code: row.project_code,
            project_name: row.project_name,
            work_package_count: Some(0),
            created_at: row.created_at.to_rfc3339(),
            updated_at: row.updated_at.to_rfc3339(),
        }),
    ))
}

/// PATCH /api/v1/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateProjectDto>,
) -> ApiResult<impl IntoResponse> {
    dto.validate().map_err(|e| ApiError::Validation(e.into()))?;

    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    let row = repo.update(id, dto).await.map_err(|e| repo_error("Project", e))?;

    Ok(Json(ProjectResponse {
        type_name: "Project".into(),
        id: row.id,
        project_code: row.project_code,
        project_name: row.project_name,
        work_package_count: None,
        created_at: row.created_at.to_rfc3339(),
        updated_at: row.updated_at.to_rfc3339(),
    }))
}

/// DELETE /api/v1/projects/:id
///
/// Cascades to work packages, BOQs, and progress entries.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    repo.delete(id).await.map_err(|e| repo_error("Project", e))?;

    Ok(StatusCode::NO_CONTENT)
}

// DTOs

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Collection<T> {
    #[serde(rename = "_type")]
    type_name: String,
    count: usize,
    elements: Vec<T>,
}

impl<T> Collection<T> {
    pub(crate) fn of(elements: Vec<T>) -> Self {
        Self {
            type_name: "Collection".into(),
            count: elements.len(),
            elements,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    #[serde(rename = "_type")]
    type_name: String,
    id: Id,
    project_code: String,
    project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    work_package_count: Option<i64>,
    created_at: String,
    updated_at: String,
}
