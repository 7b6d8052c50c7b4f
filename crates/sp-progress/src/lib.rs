//! # sp-progress
//!
//! The progress aggregation engine: cost-weighted roll-ups from raw quantity
//! entries to percentage-complete figures at BOQ, work-package, and project
//! level, plus the cumulative-over-time computation behind history views and
//! the remaining-budget arithmetic behind the write-time guard.
//!
//! Everything in this crate is pure and synchronous. It consumes a loaded
//! snapshot graph (`sp_models::graph`) and produces derived view models; it
//! never touches storage and never fails -- zero budgets and empty subtrees
//! fold to zero, not to NaN or errors.

pub mod aggregator;
pub mod guard;
pub mod history;

pub use aggregator::{
    aggregate_all, aggregate_boq, aggregate_project, aggregate_work_package, BoqSummary,
    ProjectSummary, WorkPackageSummary,
};
pub use guard::{check_proposed_qty, remaining_budget};
pub use history::{cumulative_history, latest_first, HistoryPoint};
