//! Entity graph loader
//!
//! Assembles the read-only Project -> WorkPackage -> BOQ -> ProgressEntry
//! snapshot that the aggregation engine consumes. Four queries per load (one
//! per level), stitched together in memory -- no N+1.

use std::collections::HashMap;

use sp_core::traits::Id;
use sp_models::{BoqNode, ProjectNode, WorkPackageNode};
use sqlx::PgPool;

use crate::boqs::BoqRow;
use crate::progress_entries::ProgressEntryRow;
use crate::projects::ProjectRow;
use crate::repository::{RepositoryError, RepositoryResult};
use crate::work_packages::WorkPackageRow;

/// Graph loader over a shared connection pool
pub struct GraphLoader {
    pool: PgPool,
}

impl GraphLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load every project with its full subtree (the dashboard read path).
    pub async fn load_all(&self) -> RepositoryResult<Vec<ProjectNode>> {
        let projects = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, project_code, project_name, created_at, updated_at
             FROM projects ORDER BY project_code ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let work_packages = sqlx::query_as::<_, WorkPackageRow>(
            "SELECT id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
             FROM work_packages ORDER BY wp_code ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let boqs = sqlx::query_as::<_, BoqRow>(
            "SELECT id, work_package_id, boq_code, description, uom,
                    budget_qty, unit_rate, created_at, updated_at
             FROM boqs ORDER BY boq_code ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, ProgressEntryRow>(
            "SELECT id, boq_id, progress_date, actual_qty, created_at, updated_at
             FROM progress_entries ORDER BY progress_date ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(projects, work_packages, boqs, entries))
    }

    /// Load one project's subtree, or None if the project does not exist.
    pub async fn load_project(&self, project_id: Id) -> RepositoryResult<Option<ProjectNode>> {
        let Some(project) = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, project_code, project_name, created_at, updated_at
             FROM projects WHERE id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let work_packages = sqlx::query_as::<_, WorkPackageRow>(
            "SELECT id, project_id, wp_code, wp_name, discipline_code, created_at, updated_at
             FROM work_packages WHERE project_id = $1 ORDER BY wp_code ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let boqs = sqlx::query_as::<_, BoqRow>(
            "SELECT b.id, b.work_package_id, b.boq_code, b.description, b.uom,
                    b.budget_qty, b.unit_rate, b.created_at, b.updated_at
             FROM boqs b
             JOIN work_packages wp ON wp.id = b.work_package_id
             WHERE wp.project_id = $1
             ORDER BY b.boq_code ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, ProgressEntryRow>(
            "SELECT pe.id, pe.boq_id, pe.progress_date, pe.actual_qty,
                    pe.created_at, pe.updated_at
             FROM progress_entries pe
             JOIN boqs b ON b.id = pe.boq_id
             JOIN work_packages wp ON wp.id = b.work_package_id
             WHERE wp.project_id = $1
             ORDER BY pe.progress_date ASC, pe.id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut nodes = assemble(vec![project], work_packages, boqs, entries);
        match nodes.len() {
            1 => Ok(nodes.pop()),
            n => Err(RepositoryError::Validation(format!(
                "expected a single project subtree, assembled {n}"
            ))),
        }
    }
}

/// Stitch flat row sets into nested nodes, preserving each level's load order.
fn assemble(
    projects: Vec<ProjectRow>,
    work_packages: Vec<WorkPackageRow>,
    boqs: Vec<BoqRow>,
    entries: Vec<ProgressEntryRow>,
) -> Vec<ProjectNode> {
    let mut nodes: Vec<ProjectNode> = projects
        .into_iter()
        .map(|p| ProjectNode::new(p.into()))
        .collect();
    let project_index: HashMap<Id, usize> = nodes
        .iter()
        .enumerate()
        .filter_map(|(i, n)| n.project.id.map(|id| (id, i)))
        .collect();

    // (project slot, wp slot) per work package id
    let mut wp_index: HashMap<Id, (usize, usize)> = HashMap::new();
    for wp in work_packages {
        if let Some(&pi) = project_index.get(&wp.project_id) {
            let slot = nodes[pi].work_packages.len();
            wp_index.insert(wp.id, (pi, slot));
            nodes[pi].work_packages.push(WorkPackageNode::new(wp.into()));
        }
    }

    let mut boq_index: HashMap<Id, (usize, usize, usize)> = HashMap::new();
    for boq in boqs {
        if let Some(&(pi, wi)) = wp_index.get(&boq.work_package_id) {
            let slot = nodes[pi].work_packages[wi].boqs.len();
            boq_index.insert(boq.id, (pi, wi, slot));
            nodes[pi].work_packages[wi].boqs.push(BoqNode::new(boq.into()));
        }
    }

    for entry in entries {
        if let Some(&(pi, wi, bi)) = boq_index.get(&entry.boq_id) {
            nodes[pi].work_packages[wi].boqs[bi]
                .progress_entries
                .push(entry.into());
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn project_row(id: i64, code: &str) -> ProjectRow {
        ProjectRow {
            id,
            project_code: code.into(),
            project_name: format!("Project {code}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn wp_row(id: i64, project_id: i64, code: &str) -> WorkPackageRow {
        WorkPackageRow {
            id,
            project_id,
            wp_code: code.into(),
            wp_name: format!("WP {code}"),
            discipline_code: "CIV".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn boq_row(id: i64, work_package_id: i64, code: &str) -> BoqRow {
        BoqRow {
            id,
            work_package_id,
            boq_code: code.into(),
            description: "Excavation".into(),
            uom: "m3".into(),
            budget_qty: 100.0,
            unit_rate: 50.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry_row(id: i64, boq_id: i64, qty: f64) -> ProgressEntryRow {
        ProgressEntryRow {
            id,
            boq_id,
            progress_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            actual_qty: qty,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_nests_by_ownership() {
        let nodes = assemble(
            vec![project_row(1, "PRJ-001"), project_row(2, "PRJ-002")],
            vec![wp_row(10, 1, "WP-01"), wp_row(11, 2, "WP-02")],
            vec![boq_row(100, 10, "BOQ-001"), boq_row(101, 11, "BOQ-002")],
            vec![entry_row(1000, 100, 30.0), entry_row(1001, 100, 20.0)],
        );

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].work_packages.len(), 1);
        assert_eq!(nodes[0].work_packages[0].boqs.len(), 1);
        assert_eq!(nodes[0].work_packages[0].boqs[0].progress_entries.len(), 2);
        assert!(nodes[1].work_packages[0].boqs[0].progress_entries.is_empty());
    }

    #[test]
    fn test_assemble_drops_orphans() {
        // A BOQ pointing at an unknown work package is skipped, not panicked on.
        let nodes = assemble(
            vec![project_row(1, "PRJ-001")],
            vec![wp_row(10, 1, "WP-01")],
            vec![boq_row(100, 99, "BOQ-001")],
            vec![entry_row(1000, 100, 30.0)],
        );

        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].work_packages[0].boqs.is_empty());
    }

    #[test]
    fn test_assemble_empty() {
        assert!(assemble(vec![], vec![], vec![], vec![]).is_empty());
    }
}
