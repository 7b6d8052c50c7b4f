//! Repository traits and shared error type
//!
//! Provides generic CRUD operations for database entities.

use async_trait::async_trait;
use sp_core::traits::Id;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Remaining budget for this BOQ is only {remaining}")]
    BudgetExceeded { remaining: f64 },
}

impl RepositoryError {
    /// Map a unique-constraint violation to a Conflict, leaving everything
    /// else as a plain database error.
    pub fn from_create(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return RepositoryError::Conflict(conflict_message.to_string());
            }
        }
        RepositoryError::Database(err)
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, CreateDto, UpdateDto>: Send + Sync {
    /// Find an entity by ID
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> RepositoryResult<Vec<T>>;

    /// Count all entities
    async fn count(&self) -> RepositoryResult<i64>;

    /// Create a new entity
    async fn create(&self, dto: CreateDto) -> RepositoryResult<T>;

    /// Update an existing entity
    async fn update(&self, id: Id, dto: UpdateDto) -> RepositoryResult<T>;

    /// Delete an entity by ID (cascades to owned children)
    async fn delete(&self, id: Id) -> RepositoryResult<()>;

    /// Check if an entity exists
    async fn exists(&self, id: Id) -> RepositoryResult<bool>;
}
