//! # sp-api
//!
//! REST API v1 handlers for SiteProgress RS.
//!
//! JSON over axum: entity CRUD, the aggregated progress dashboard, guarded
//! progress-entry creation, and per-BOQ cumulative history.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
