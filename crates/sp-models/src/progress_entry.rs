//! Progress Entry model
//!
//! Table: progress_entries
//!
//! A dated quantity of work recorded against a BOQ line item. Entries are
//! immutable once written; there is no update or delete operation. The raw
//! stored value is never clamped -- only read-time aggregates clamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sp_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::{Validate, ValidationError};

/// Progress entry entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: Option<Id>,

    /// Owning BOQ line item
    pub boq_id: Id,

    /// Calendar date the work was performed
    pub progress_date: NaiveDate,

    /// Recorded quantity, in the BOQ's unit of measure
    pub actual_qty: f64,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for ProgressEntry {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for ProgressEntry {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for ProgressEntry {
    const TABLE_NAME: &'static str = "progress_entries";
    const TYPE_NAME: &'static str = "ProgressEntry";
}

/// DTO for recording progress against a BOQ
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressEntryDto {
    pub boq_id: Id,

    pub progress_date: NaiveDate,

    /// Must be strictly positive; the budget guard rejects the rest
    #[validate(custom = "validate_positive_qty")]
    pub actual_qty: f64,
}

fn validate_positive_qty(qty: f64) -> Result<(), ValidationError> {
    if qty > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("positive_qty");
        err.message = Some("must be greater than 0".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_qty_rejected() {
        let dto = CreateProgressEntryDto {
            boq_id: 1,
            progress_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            actual_qty: 0.0,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_positive_qty_accepted() {
        let dto = CreateProgressEntryDto {
            boq_id: 1,
            progress_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            actual_qty: 12.5,
        };
        assert!(dto.validate().is_ok());
    }
}
