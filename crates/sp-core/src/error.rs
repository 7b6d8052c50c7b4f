//! Core error types for SiteProgress RS
//!
//! Field-level validation errors plus the operation-level error enum shared
//! by the service and database layers.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all SiteProgress operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Remaining budget for this BOQ is only {remaining}")]
    BudgetExceeded { remaining: f64 },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors collection, keyed by field name
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", err.code));
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

/// HTTP status code mapping for errors
impl CoreError {
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::NotFound { .. } => 404,
            CoreError::Validation(_) | CoreError::BudgetExceeded { .. } => 422,
            CoreError::Conflict { .. } => 409,
            CoreError::Database(_) | CoreError::Internal(_) | CoreError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "not_found",
            CoreError::Validation(_) => "validation_failed",
            CoreError::BudgetExceeded { .. } => "budget_exceeded",
            CoreError::Conflict { .. } => "conflict",
            CoreError::Database(_) => "database_error",
            CoreError::Config(_) => "configuration_error",
            CoreError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_add_and_query() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("actual_qty", "must be greater than 0");
        errors.add_base("BOQ does not exist");

        assert!(!errors.is_empty());
        assert!(errors.has_error("actual_qty"));
        assert_eq!(errors.full_messages().len(), 2);
    }

    #[test]
    fn test_validation_errors_merge() {
        let mut a = ValidationErrors::new();
        a.add("boq_id", "is required");

        let mut b = ValidationErrors::new();
        b.add("boq_id", "must reference an existing BOQ");
        b.add("progress_date", "is not a valid date");

        a.merge(b);
        assert_eq!(a.get("boq_id").map(Vec::len), Some(2));
        assert!(a.has_error("progress_date"));
    }

    #[test]
    fn test_budget_exceeded_status() {
        let err = CoreError::BudgetExceeded { remaining: 10.0 };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "budget_exceeded");
        assert!(err.to_string().contains("10"));
    }
}
