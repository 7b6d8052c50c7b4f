//! BOQ (Bill of Quantities) model
//!
//! Table: boqs
//!
//! A BOQ is a priced line item: a budgeted quantity of work in some unit of
//! measure, priced at a unit rate. The monetary amount (`budget_qty *
//! unit_rate`) is derived at read time, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sp_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// BOQ line item entity
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Boq {
    pub id: Option<Id>,

    /// Owning work package
    pub work_package_id: Id,

    /// Unique business code, e.g. "BOQ-CIV-001"
    #[validate(length(min = 1, max = 50))]
    pub boq_code: String,

    #[validate(length(min = 1))]
    pub description: String,

    /// Unit-of-measure label, e.g. "m3", "kg", "ls"
    #[validate(length(min = 1, max = 20))]
    pub uom: String,

    /// Budgeted quantity, >= 0
    #[validate(range(min = 0.0))]
    pub budget_qty: f64,

    /// Price per unit, >= 0
    #[validate(range(min = 0.0))]
    pub unit_rate: f64,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Boq {
    /// Contract amount for this line item
    pub fn amount(&self) -> f64 {
        self.budget_qty * self.unit_rate
    }
}

impl Identifiable for Boq {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Boq {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Boq {
    const TABLE_NAME: &'static str = "boqs";
    const TYPE_NAME: &'static str = "Boq";
}

/// DTO for creating a BOQ line item
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoqDto {
    pub work_package_id: Id,

    #[validate(length(min = 1, max = 50))]
    pub boq_code: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 20))]
    pub uom: String,

    #[validate(range(min = 0.0))]
    pub budget_qty: f64,

    #[validate(range(min = 0.0))]
    pub unit_rate: f64,
}

/// DTO for updating a BOQ line item
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoqDto {
    pub work_package_id: Option<Id>,

    #[validate(length(min = 1, max = 50))]
    pub boq_code: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub uom: Option<String>,

    #[validate(range(min = 0.0))]
    pub budget_qty: Option<f64>,

    #[validate(range(min = 0.0))]
    pub unit_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount() {
        let boq = Boq {
            budget_qty: 100.0,
            unit_rate: 50.0,
            ..Default::default()
        };
        assert_eq!(boq.amount(), 5000.0);
    }

    #[test]
    fn test_negative_budget_rejected() {
        let dto = CreateBoqDto {
            work_package_id: 1,
            boq_code: "BOQ-001".into(),
            description: "Excavation".into(),
            uom: "m3".into(),
            budget_qty: -1.0,
            unit_rate: 10.0,
        };
        assert!(dto.validate().is_err());
    }
}
