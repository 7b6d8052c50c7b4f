//! API error handling
//!
//! Maps repository and validation failures to JSON error responses. The
//! budget-exceeded case carries the numeric remaining budget so clients can
//! show it next to the rejected form field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sp_core::error::ValidationErrors;
use sp_db::RepositoryError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { message: String },
    Validation(ValidationErrors),
    BudgetExceeded { remaining: f64 },
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            message: format!("{} with id {} not found", resource, id),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BudgetExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Map repository failures onto API responses. Repository not-found messages
/// already name the entity and id, so they pass through as the whole message.
pub fn repo_error(resource: &'static str, err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound(msg) => {
            tracing::debug!(resource, %msg, "lookup failed");
            ApiError::NotFound { message: msg }
        }
        RepositoryError::Conflict(msg) => ApiError::Conflict(msg),
        RepositoryError::Validation(msg) => {
            let mut errors = ValidationErrors::new();
            errors.add_base(msg);
            ApiError::Validation(errors)
        }
        RepositoryError::BudgetExceeded { remaining } => ApiError::BudgetExceeded { remaining },
        RepositoryError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(rename = "_type")]
    type_name: String,
    error_identifier: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_budget: Option<f64>,
}

impl ErrorBody {
    fn new(identifier: &str, message: impl Into<String>) -> Self {
        Self {
            type_name: "Error".into(),
            error_identifier: format!("urn:siteprogress:api:v1:errors:{identifier}"),
            message: message.into(),
            remaining_budget: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::NotFound { message } => ErrorBody::new("NotFound", message.clone()),
            ApiError::Validation(errors) => ErrorBody::new(
                "PropertyConstraintViolation",
                errors.full_messages().join(", "),
            ),
            ApiError::BudgetExceeded { remaining } => {
                let mut body = ErrorBody::new(
                    "BudgetExceeded",
                    format!("Remaining budget for this BOQ is only {remaining}"),
                );
                body.remaining_budget = Some(*remaining);
                body
            }
            ApiError::BadRequest(msg) => ErrorBody::new("InvalidRequestBody", msg.clone()),
            ApiError::Conflict(msg) => ErrorBody::new("UpdateConflict", msg.clone()),
            ApiError::Internal(msg) => ErrorBody::new("InternalError", msg.clone()),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::not_found("Boq", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BudgetExceeded { remaining: 10.0 }.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::conflict("boq_code is already taken").status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_repo_error_mapping() {
        let err = repo_error(
            "Boq",
            RepositoryError::BudgetExceeded { remaining: 12.5 },
        );
        match err {
            ApiError::BudgetExceeded { remaining } => assert_eq!(remaining, 12.5),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_missing_boq_on_write_is_a_validation_error() {
        // Recording progress against a nonexistent BOQ is a field-level
        // validation failure (422), like the other missing-parent checks,
        // not a 404.
        let err = repo_error(
            "ProgressEntry",
            RepositoryError::Validation("boq_id 7 does not reference an existing BOQ".into()),
        );
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            ApiError::Validation(errors) => {
                assert!(errors
                    .full_messages()
                    .join(", ")
                    .contains("boq_id 7 does not reference an existing BOQ"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_message_is_single_prose() {
        let err = repo_error(
            "Boq",
            RepositoryError::NotFound("BOQ with id 7 not found".into()),
        );
        match err {
            ApiError::NotFound { message } => {
                assert_eq!(message, "BOQ with id 7 not found");
                assert_eq!(message.matches("not found").count(), 1);
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
