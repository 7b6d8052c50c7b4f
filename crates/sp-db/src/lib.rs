//! # sp-db
//!
//! Database layer for SiteProgress RS.
//!
//! This crate provides PostgreSQL database access using SQLx, including:
//!
//! - Connection pool management
//! - Repository pattern for CRUD operations
//! - The transactional budget guard for progress-entry creation
//! - The graph loader that assembles the snapshot consumed by `sp-progress`
//!
//! ## Example
//!
//! ```ignore
//! use sp_db::{Database, DatabaseConfig, GraphLoader};
//! use sp_progress::aggregate_all;
//!
//! let db = Database::connect(&DatabaseConfig::default()).await?;
//! let graph = GraphLoader::new(db.pool().clone()).load_all().await?;
//! let summaries = aggregate_all(&graph);
//! ```

pub mod boqs;
pub mod graph;
pub mod pool;
pub mod progress_entries;
pub mod projects;
pub mod repository;
pub mod work_packages;

// Re-exports
pub use boqs::{BoqRepository, BoqRow, BoqWithCounts};
pub use graph::GraphLoader;
pub use pool::{Database, DatabaseConfig};
pub use progress_entries::{ProgressEntryRepository, ProgressEntryRow};
pub use projects::{ProjectRepository, ProjectRow, ProjectWithCounts};
pub use repository::{Repository, RepositoryError, RepositoryResult};
pub use work_packages::{WorkPackageRepository, WorkPackageRow, WorkPackageWithCounts};
