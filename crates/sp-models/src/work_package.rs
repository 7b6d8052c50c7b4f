//! Work Package model
//!
//! Table: work_packages
//!
//! A work package groups BOQ line items under one discipline within a
//! project (e.g. all civil works, all piping).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sp_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// Work Package entity
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackage {
    pub id: Option<Id>,

    /// Owning project
    pub project_id: Id,

    /// Unique business code, e.g. "WP-CIV-01"
    #[validate(length(min = 1, max = 50))]
    pub wp_code: String,

    #[validate(length(min = 1, max = 255))]
    pub wp_name: String,

    /// Discipline label, e.g. "CIV", "MEC", "ELE"
    #[validate(length(min = 1, max = 50))]
    pub discipline_code: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkPackage {
    pub fn new(project_id: Id, wp_code: impl Into<String>, wp_name: impl Into<String>) -> Self {
        Self {
            project_id,
            wp_code: wp_code.into(),
            wp_name: wp_name.into(),
            ..Default::default()
        }
    }
}

impl Identifiable for WorkPackage {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for WorkPackage {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for WorkPackage {
    const TABLE_NAME: &'static str = "work_packages";
    const TYPE_NAME: &'static str = "WorkPackage";
}

/// DTO for creating a work package
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkPackageDto {
    pub project_id: Id,

    #[validate(length(min = 1, max = 50))]
    pub wp_code: String,

    #[validate(length(min = 1, max = 255))]
    pub wp_name: String,

    #[validate(length(min = 1, max = 50))]
    pub discipline_code: String,
}

/// DTO for updating a work package
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkPackageDto {
    pub project_id: Option<Id>,

    #[validate(length(min = 1, max = 50))]
    pub wp_code: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub wp_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub discipline_code: Option<String>,
}
