//! Progress Aggregator
//!
//! Single bottom-up pass over a loaded project graph, innermost level first:
//!
//! 1. BOQ: `amount = budget_qty * unit_rate`, actual clamped to budget,
//!    `progress_pct = actual / budget * 100` (0 when the budget is zero).
//! 2. Work package: cost-weighted average of BOQ percentages, weighted by
//!    each line item's monetary amount.
//! 3. Project: same shape over work-package totals.
//!
//! Cost-weighting makes a single high-value line item dominate its parent's
//! reading in proportion to contract value, which is the economically
//! meaningful metric for construction billing. A simple average of
//! percentages would let a trivial line item count as much as the largest.

use serde::Serialize;
use sp_models::{Boq, BoqNode, Project, ProjectNode, WorkPackage, WorkPackageNode};
use tracing::warn;

/// Derived figures for one BOQ line item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoqSummary {
    #[serde(flatten)]
    pub boq: Boq,
    /// Contract amount: budget_qty * unit_rate
    pub amount: f64,
    /// Recorded quantity, clamped to never exceed budget_qty
    pub actual_qty: f64,
    /// Percentage complete, in [0, 100]
    pub progress_pct: f64,
    /// True when the raw entry sum exceeds the budget (guard bypassed or
    /// budget reduced after the fact); the clamp hides the drift, this flags it
    pub over_budget: bool,
}

/// Derived figures for one work package
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageSummary {
    #[serde(flatten)]
    pub work_package: WorkPackage,
    /// Sum of BOQ amounts
    pub total_amount: f64,
    /// Cost-weighted percentage complete, in [0, 100]
    pub progress_pct: f64,
    pub boqs: Vec<BoqSummary>,
}

/// Derived figures for one project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    /// Sum of work-package total amounts
    pub total_contract_value: f64,
    /// Cost-weighted percentage complete, in [0, 100]
    pub overall_progress_pct: f64,
    pub work_packages: Vec<WorkPackageSummary>,
}

/// Compute derived figures for a single BOQ line item.
pub fn aggregate_boq(node: &BoqNode) -> BoqSummary {
    let boq = &node.boq;
    let amount = boq.amount();

    let raw_actual: f64 = node.progress_entries.iter().map(|e| e.actual_qty).sum();

    // Clamp so the visible actual never exceeds budget, even if entries
    // over-accumulated behind the guard's back.
    let actual_qty = raw_actual.min(boq.budget_qty);
    let over_budget = raw_actual > boq.budget_qty;
    if over_budget {
        warn!(
            boq_code = %boq.boq_code,
            raw_actual,
            budget_qty = boq.budget_qty,
            "recorded progress exceeds budget; clamping for display"
        );
    }

    let progress_pct = if boq.budget_qty > 0.0 {
        actual_qty / boq.budget_qty * 100.0
    } else {
        0.0
    };

    BoqSummary {
        boq: boq.clone(),
        amount,
        actual_qty,
        progress_pct,
        over_budget,
    }
}

/// Compute derived figures for a work package and all its BOQs.
pub fn aggregate_work_package(node: &WorkPackageNode) -> WorkPackageSummary {
    let boqs: Vec<BoqSummary> = node.boqs.iter().map(aggregate_boq).collect();

    let (total_amount, weighted_sum) = boqs.iter().fold((0.0, 0.0), |(total, weighted), b| {
        (total + b.amount, weighted + b.progress_pct / 100.0 * b.amount)
    });

    let progress_pct = if total_amount > 0.0 {
        weighted_sum / total_amount * 100.0
    } else {
        0.0
    };

    WorkPackageSummary {
        work_package: node.work_package.clone(),
        total_amount,
        progress_pct,
        boqs,
    }
}

/// Compute derived figures for a project and its whole subtree.
pub fn aggregate_project(node: &ProjectNode) -> ProjectSummary {
    let work_packages: Vec<WorkPackageSummary> = node
        .work_packages
        .iter()
        .map(aggregate_work_package)
        .collect();

    let (total_contract_value, weighted_sum) =
        work_packages.iter().fold((0.0, 0.0), |(total, weighted), wp| {
            (
                total + wp.total_amount,
                weighted + wp.progress_pct / 100.0 * wp.total_amount,
            )
        });

    let overall_progress_pct = if total_contract_value > 0.0 {
        weighted_sum / total_contract_value * 100.0
    } else {
        0.0
    };

    ProjectSummary {
        project: node.project.clone(),
        total_contract_value,
        overall_progress_pct,
        work_packages,
    }
}

/// Aggregate a batch of loaded projects (the dashboard read path).
pub fn aggregate_all(nodes: &[ProjectNode]) -> Vec<ProjectSummary> {
    nodes.iter().map(aggregate_project).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sp_models::ProgressEntry;

    fn entry(boq_id: i64, day: u32, qty: f64) -> ProgressEntry {
        ProgressEntry {
            boq_id,
            progress_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            actual_qty: qty,
            ..Default::default()
        }
    }

    fn boq_node(budget_qty: f64, unit_rate: f64, quantities: &[f64]) -> BoqNode {
        let mut node = BoqNode::new(Boq {
            id: Some(1),
            work_package_id: 1,
            boq_code: "BOQ-001".into(),
            description: "Excavation".into(),
            uom: "m3".into(),
            budget_qty,
            unit_rate,
            ..Default::default()
        });
        node.progress_entries = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| entry(1, (i + 1) as u32, q))
            .collect();
        node
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_boq_basic_aggregation() {
        let summary = aggregate_boq(&boq_node(100.0, 50.0, &[30.0, 20.0]));
        assert_close(summary.amount, 5000.0);
        assert_close(summary.actual_qty, 50.0);
        assert_close(summary.progress_pct, 50.0);
        assert!(!summary.over_budget);
    }

    #[test]
    fn test_boq_clamps_over_accumulated_entries() {
        let summary = aggregate_boq(&boq_node(100.0, 50.0, &[80.0, 40.0]));
        assert_close(summary.actual_qty, 100.0);
        assert_close(summary.progress_pct, 100.0);
        assert!(summary.over_budget);
    }

    #[test]
    fn test_boq_zero_budget_is_zero_percent() {
        let summary = aggregate_boq(&boq_node(0.0, 50.0, &[10.0]));
        assert_close(summary.progress_pct, 0.0);
        assert_close(summary.actual_qty, 0.0);
    }

    #[test]
    fn test_boq_no_entries() {
        let summary = aggregate_boq(&boq_node(100.0, 50.0, &[]));
        assert_close(summary.actual_qty, 0.0);
        assert_close(summary.progress_pct, 0.0);
    }

    #[test]
    fn test_work_package_cost_weighting() {
        // BOQ A: budget=100, rate=50 => amount 5000, fully complete
        // BOQ B: budget=50, rate=200 => amount 10000, not started
        let mut wp = WorkPackageNode::new(WorkPackage::new(1, "WP-01", "Civil"));
        wp.boqs.push(boq_node(100.0, 50.0, &[100.0]));
        wp.boqs.push({
            let mut b = boq_node(50.0, 200.0, &[]);
            b.boq.id = Some(2);
            b.boq.boq_code = "BOQ-002".into();
            b
        });

        let summary = aggregate_work_package(&wp);
        assert_close(summary.total_amount, 15000.0);
        assert_close(summary.progress_pct, 5000.0 / 15000.0 * 100.0);
    }

    #[test]
    fn test_weighted_average_degenerates_to_common_value() {
        // Two BOQs at the same percentage but wildly different amounts:
        // the weighted average must equal that common percentage.
        let mut wp = WorkPackageNode::new(WorkPackage::new(1, "WP-01", "Civil"));
        wp.boqs.push(boq_node(100.0, 1.0, &[25.0]));
        wp.boqs.push(boq_node(400.0, 500.0, &[100.0]));

        let summary = aggregate_work_package(&wp);
        assert_close(summary.progress_pct, 25.0);
    }

    #[test]
    fn test_empty_work_package_is_zero() {
        let wp = WorkPackageNode::new(WorkPackage::new(1, "WP-01", "Civil"));
        let summary = aggregate_work_package(&wp);
        assert_close(summary.total_amount, 0.0);
        assert_close(summary.progress_pct, 0.0);
    }

    #[test]
    fn test_project_end_to_end() {
        let mut wp = WorkPackageNode::new(WorkPackage::new(1, "WP-01", "Civil"));
        wp.boqs.push(boq_node(100.0, 50.0, &[100.0]));
        wp.boqs.push({
            let mut b = boq_node(50.0, 200.0, &[]);
            b.boq.id = Some(2);
            b
        });

        let mut project = ProjectNode::new(Project::new("PRJ-001", "Harbour Expansion"));
        project.work_packages.push(wp);

        let summary = aggregate_project(&project);
        assert_close(summary.total_contract_value, 15000.0);
        assert_close(summary.overall_progress_pct, 100.0 / 3.0);
    }

    #[test]
    fn test_empty_project_is_zero() {
        let project = ProjectNode::new(Project::new("PRJ-002", "Empty"));
        let summary = aggregate_project(&project);
        assert_close(summary.total_contract_value, 0.0);
        assert_close(summary.overall_progress_pct, 0.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let mut wp = WorkPackageNode::new(WorkPackage::new(1, "WP-01", "Civil"));
        wp.boqs.push(boq_node(100.0, 50.0, &[30.0, 20.0]));
        let mut project = ProjectNode::new(Project::new("PRJ-001", "Harbour Expansion"));
        project.work_packages.push(wp);

        let first = aggregate_project(&project);
        let second = aggregate_project(&project);
        assert_eq!(first.overall_progress_pct, second.overall_progress_pct);
        assert_eq!(first.total_contract_value, second.total_contract_value);
        assert_eq!(
            first.work_packages[0].progress_pct,
            second.work_packages[0].progress_pct
        );
    }

    #[test]
    fn test_invariants_hold_across_levels() {
        let mut wp = WorkPackageNode::new(WorkPackage::new(1, "WP-01", "Civil"));
        wp.boqs.push(boq_node(100.0, 50.0, &[80.0, 40.0]));
        wp.boqs.push(boq_node(0.0, 10.0, &[5.0]));
        let mut project = ProjectNode::new(Project::new("PRJ-001", "Harbour Expansion"));
        project.work_packages.push(wp);

        let summary = aggregate_project(&project);
        for wp in &summary.work_packages {
            assert!(wp.progress_pct >= 0.0 && wp.progress_pct <= 100.0);
            for boq in &wp.boqs {
                assert!(boq.actual_qty >= 0.0 && boq.actual_qty <= boq.boq.budget_qty);
                assert!(boq.progress_pct >= 0.0 && boq.progress_pct <= 100.0);
            }
        }
        assert!(summary.overall_progress_pct >= 0.0 && summary.overall_progress_pct <= 100.0);
    }
}
