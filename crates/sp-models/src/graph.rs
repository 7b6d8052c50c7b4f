//! Loaded entity graph
//!
//! A read-only snapshot of Project -> WorkPackage -> BOQ -> ProgressEntry,
//! assembled by the database layer and consumed by the aggregation engine.
//! The aggregator never touches storage; it only folds over these nodes.

use serde::Serialize;

use crate::{Boq, ProgressEntry, Project, WorkPackage};

/// A BOQ with its full set of progress entries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqNode {
    #[serde(flatten)]
    pub boq: Boq,
    pub progress_entries: Vec<ProgressEntry>,
}

/// A work package with its BOQ line items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageNode {
    #[serde(flatten)]
    pub work_package: WorkPackage,
    pub boqs: Vec<BoqNode>,
}

/// A fully loaded project subtree
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    #[serde(flatten)]
    pub project: Project,
    pub work_packages: Vec<WorkPackageNode>,
}

impl BoqNode {
    pub fn new(boq: Boq) -> Self {
        Self {
            boq,
            progress_entries: Vec::new(),
        }
    }
}

impl WorkPackageNode {
    pub fn new(work_package: WorkPackage) -> Self {
        Self {
            work_package,
            boqs: Vec::new(),
        }
    }
}

impl ProjectNode {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            work_packages: Vec::new(),
        }
    }
}
