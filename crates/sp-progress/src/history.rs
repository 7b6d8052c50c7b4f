//! Cumulative History Builder
//!
//! Chronological view of a single BOQ's progress: entries sorted ascending by
//! date, folded into running totals. The percentage is capped at 100 after
//! division, matching the read path's clamp for over-accumulated entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sp_core::traits::Id;
use sp_models::ProgressEntry;

/// One entry of a BOQ's history, annotated with its running total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub id: Option<Id>,
    pub progress_date: NaiveDate,
    /// Quantity recorded by this entry alone
    pub actual_qty: f64,
    /// Sum of this entry and all earlier-dated entries
    pub cumulative_qty: f64,
    /// Cumulative percentage complete, capped at 100 (0 when budget is zero)
    pub progress_pct: f64,
    pub created_at: Option<DateTime<Utc>>,
}

/// Build the ascending-by-date cumulative sequence for one BOQ.
///
/// The sort is stable: entries sharing a date keep their given order, so
/// callers loading in insertion order get deterministic output.
pub fn cumulative_history(budget_qty: f64, entries: &[ProgressEntry]) -> Vec<HistoryPoint> {
    let mut sorted: Vec<&ProgressEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.progress_date);

    let mut cumulative = 0.0;
    sorted
        .into_iter()
        .map(|entry| {
            cumulative += entry.actual_qty;
            let progress_pct = if budget_qty > 0.0 {
                (cumulative / budget_qty * 100.0).min(100.0)
            } else {
                0.0
            };

            HistoryPoint {
                id: entry.id,
                progress_date: entry.progress_date,
                actual_qty: entry.actual_qty,
                cumulative_qty: cumulative,
                progress_pct,
                created_at: entry.created_at,
            }
        })
        .collect()
}

/// Latest-first view for display: the same computed points, reversed.
pub fn latest_first(mut points: Vec<HistoryPoint>) -> Vec<HistoryPoint> {
    points.reverse();
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, date: (i32, u32, u32), qty: f64) -> ProgressEntry {
        ProgressEntry {
            id: Some(id),
            boq_id: 1,
            progress_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            actual_qty: qty,
            ..Default::default()
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_cumulative_sequence() {
        // Entries arrive out of date order; the builder sorts ascending.
        let entries = vec![
            entry(2, (2025, 2, 10), 900.0),
            entry(1, (2025, 1, 10), 800.0),
        ];

        let points = cumulative_history(3000.0, &entries);
        assert_eq!(points.len(), 2);

        assert_eq!(points[0].id, Some(1));
        assert_close(points[0].cumulative_qty, 800.0);
        assert_close(points[0].progress_pct, 800.0 / 3000.0 * 100.0);

        assert_eq!(points[1].id, Some(2));
        assert_close(points[1].cumulative_qty, 1700.0);
        assert_close(points[1].progress_pct, 1700.0 / 3000.0 * 100.0);
    }

    #[test]
    fn test_latest_first_reverses_without_recompute() {
        let entries = vec![
            entry(1, (2025, 1, 10), 800.0),
            entry(2, (2025, 2, 10), 900.0),
        ];

        let ascending = cumulative_history(3000.0, &entries);
        let descending = latest_first(ascending.clone());

        assert_eq!(descending[0].id, Some(2));
        assert_eq!(descending[0].progress_date, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        // Running totals are the computed ones, not recomputed downwards
        assert_close(descending[0].cumulative_qty, 1700.0);
        assert_close(descending[1].cumulative_qty, 800.0);
    }

    #[test]
    fn test_percentage_capped_at_100() {
        let entries = vec![
            entry(1, (2025, 1, 10), 80.0),
            entry(2, (2025, 1, 20), 40.0),
        ];

        let points = cumulative_history(100.0, &entries);
        assert_close(points[0].progress_pct, 80.0);
        assert_close(points[1].progress_pct, 100.0);
        // The cumulative quantity itself is not clamped
        assert_close(points[1].cumulative_qty, 120.0);
    }

    #[test]
    fn test_zero_budget_yields_zero_percent() {
        let entries = vec![entry(1, (2025, 1, 10), 10.0)];
        let points = cumulative_history(0.0, &entries);
        assert_close(points[0].progress_pct, 0.0);
        assert_close(points[0].cumulative_qty, 10.0);
    }

    #[test]
    fn test_same_date_keeps_insertion_order() {
        let entries = vec![
            entry(7, (2025, 3, 1), 5.0),
            entry(8, (2025, 3, 1), 3.0),
        ];

        let points = cumulative_history(100.0, &entries);
        assert_eq!(points[0].id, Some(7));
        assert_eq!(points[1].id, Some(8));
        assert_close(points[1].cumulative_qty, 8.0);
    }

    #[test]
    fn test_empty_entries() {
        assert!(cumulative_history(100.0, &[]).is_empty());
    }
}
