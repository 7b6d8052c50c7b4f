//! Application state shared by API handlers

use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};

/// Application state
///
/// The pool is optional so the router can be built without a database (for
/// health probes and router tests); data handlers fail with a 500 instead of
/// panicking when it is absent.
#[derive(Clone, Default)]
pub struct AppState {
    db: Option<PgPool>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { db: Some(pool) }
    }

    pub fn without_database() -> Self {
        Self { db: None }
    }

    pub fn pool(&self) -> ApiResult<&PgPool> {
        self.db
            .as_ref()
            .ok_or_else(|| ApiError::internal("Database is not available"))
    }
}
