//! Write-time budget guard
//!
//! Before a new progress entry is persisted, the proposed quantity is checked
//! against the BOQ's remaining budget: `budget_qty` minus the raw, unclamped
//! sum of everything already recorded. The arithmetic lives here; the
//! database layer runs it inside a transaction holding a row lock on the BOQ
//! so two concurrent writers cannot both pass the check.
//!
//! Accepted entries are stored unmodified -- only read-time aggregates clamp.

use sp_core::error::CoreError;
use sp_models::ProgressEntry;

/// Raw remaining budget for a BOQ: budget minus the unclamped entry sum.
///
/// Can be negative when recorded progress already exceeds the budget (guard
/// bypassed by seed data, or the budget was reduced after entries existed).
pub fn remaining_budget(budget_qty: f64, entries: &[ProgressEntry]) -> f64 {
    let current: f64 = entries.iter().map(|e| e.actual_qty).sum();
    budget_qty - current
}

/// Reject a proposed quantity that would push the recorded total past budget.
pub fn check_proposed_qty(proposed_qty: f64, remaining: f64) -> Result<(), CoreError> {
    if proposed_qty > remaining {
        Err(CoreError::BudgetExceeded { remaining })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(qty: f64) -> ProgressEntry {
        ProgressEntry {
            boq_id: 1,
            progress_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            actual_qty: qty,
            ..Default::default()
        }
    }

    #[test]
    fn test_remaining_budget() {
        let entries = vec![entry(50.0), entry(40.0)];
        assert_eq!(remaining_budget(100.0, &entries), 10.0);
        assert_eq!(remaining_budget(100.0, &[]), 100.0);
    }

    #[test]
    fn test_remaining_budget_can_go_negative() {
        let entries = vec![entry(120.0)];
        assert_eq!(remaining_budget(100.0, &entries), -20.0);
    }

    #[test]
    fn test_guard_rejects_over_budget() {
        // budget 100, recorded 90: 15 must be rejected reporting remaining 10
        let entries = vec![entry(90.0)];
        let remaining = remaining_budget(100.0, &entries);
        let err = check_proposed_qty(15.0, remaining).unwrap_err();
        match err {
            CoreError::BudgetExceeded { remaining } => assert_eq!(remaining, 10.0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_guard_accepts_exact_remaining() {
        let entries = vec![entry(90.0)];
        let remaining = remaining_budget(100.0, &entries);
        assert!(check_proposed_qty(10.0, remaining).is_ok());
    }
}
