//! # sp-models
//!
//! Domain models for SiteProgress RS.
//!
//! This crate contains the entity structs that map to the database tables
//! (`projects`, `work_packages`, `boqs`, `progress_entries`) and the loaded
//! snapshot graph consumed by the aggregation engine in `sp-progress`.
//! Derived figures (amounts, percentages) are never stored on these types;
//! they live on the view models produced by the aggregator.

pub use sp_core::traits::{Entity, Id, Identifiable, Timestamped};

pub mod boq;
pub mod graph;
pub mod progress_entry;
pub mod project;
pub mod work_package;

// Re-exports for convenience
pub use boq::{Boq, CreateBoqDto, UpdateBoqDto};
pub use graph::{BoqNode, ProjectNode, WorkPackageNode};
pub use progress_entry::{CreateProgressEntryDto, ProgressEntry};
pub use project::{CreateProjectDto, Project, UpdateProjectDto};
pub use work_package::{CreateWorkPackageDto, UpdateWorkPackageDto, WorkPackage};
