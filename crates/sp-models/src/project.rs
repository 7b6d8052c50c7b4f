//! Project model
//!
//! Table: projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sp_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// Project entity
///
/// The root of the ownership hierarchy: a project owns work packages, which
/// own BOQ line items, which own progress entries. Deleting a project
/// cascades through all descendants.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    /// Unique business code, e.g. "PRJ-001"
    #[validate(length(min = 1, max = 50))]
    pub project_code: String,

    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub project_name: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(project_code: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            project_code: project_code.into(),
            project_name: project_name.into(),
            ..Default::default()
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

/// DTO for creating a new project
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 50))]
    pub project_code: String,

    #[validate(length(min = 1, max = 255))]
    pub project_name: String,
}

/// DTO for updating a project
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDto {
    #[validate(length(min = 1, max = 50))]
    pub project_code: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub project_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_new() {
        let project = Project::new("PRJ-001", "Harbour Expansion");
        assert_eq!(project.project_code, "PRJ-001");
        assert!(project.is_new_record());
    }

    #[test]
    fn test_create_dto_validation() {
        let dto = CreateProjectDto {
            project_code: "".into(),
            project_name: "Harbour Expansion".into(),
        };
        assert!(dto.validate().is_err());
    }
}
