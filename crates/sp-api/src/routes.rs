//! API routes

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use serde::Serialize;

use crate::extractors::AppState;
use crate::handlers::{boqs, progress_entries, projects, work_packages};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/projects", projects_router())
        .nest("/work_packages", work_packages_router())
        .nest("/boqs", boqs_router())
        .route("/progress_entries", post(progress_entries::create_progress_entry))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects))
        .route("/", post(projects::create_project))
        .route("/dashboard", get(projects::dashboard))
        .route("/:id", get(projects::get_project))
        .route("/:id", patch(projects::update_project))
        .route("/:id", delete(projects::delete_project))
        .route("/:id/progress", get(projects::get_project_progress))
}

fn work_packages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(work_packages::list_work_packages))
        .route("/", post(work_packages::create_work_package))
        .route("/:id", get(work_packages::get_work_package))
        .route("/:id", patch(work_packages::update_work_package))
        .route("/:id", delete(work_packages::delete_work_package))
}

fn boqs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(boqs::list_boqs))
        .route("/", post(boqs::create_boq))
        .route("/:id", get(boqs::get_boq))
        .route("/:id", patch(boqs::update_boq))
        .route("/:id", delete(boqs::delete_boq))
        .route("/:id/remaining_budget", get(boqs::get_remaining_budget))
        .route("/:id/history", get(boqs::get_history))
}

async fn api_root() -> axum::Json<ApiRoot> {
    axum::Json(ApiRoot {
        type_name: "Root".into(),
        instance_name: "SiteProgress RS".into(),
    })
}

#[derive(Serialize)]
struct ApiRoot {
    #[serde(rename = "_type")]
    type_name: String,
    #[serde(rename = "instanceName")]
    instance_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        router().with_state(AppState::without_database())
    }

    #[tokio::test]
    async fn test_api_root() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/v1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_data_route_without_database_is_500() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
