use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;

pub const DEFAULT_DEPARTMENT_NAME: &str = "GESBMS";
pub const DEFAULT_DEPARTMENT_DESCRIPTION: &str = "GES Building Management System - Default Department";

/// A `departments` row. Rows written elsewhere may leave `description` or
/// `created_at` null.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Validate, Debug)]
pub struct NewDepartment {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
}

impl NewDepartment {
    pub fn new(name: &str, description: &str) -> Self {
        NewDepartment {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// Assigns a fresh v4 id and stamps the creation time.
    pub fn into_department(self) -> Department {
        Department {
            id: Uuid::new_v4(),
            name: self.name,
            description: Some(self.description),
            created_at: Some(Utc::now()),
        }
    }
}

/// Outcome of a provisioning run.
#[derive(Debug, Clone, PartialEq)]
pub enum Provisioned {
    Existing(Department),
    Created(Department),
}

impl Provisioned {
    pub fn department(&self) -> &Department {
        match self {
            Provisioned::Existing(department) | Provisioned::Created(department) => department,
        }
    }

    pub fn id(&self) -> Uuid {
        self.department().id
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Provisioned::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_department_generates_distinct_ids() {
        let a = NewDepartment::new("GESBMS", "x").into_department();
        let b = NewDepartment::new("GESBMS", "x").into_department();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.get_version_num(), 4);
    }

    #[test]
    fn empty_name_fails_validation() {
        assert!(NewDepartment::new("", "x").validate().is_err());
        assert!(NewDepartment::new(DEFAULT_DEPARTMENT_NAME, DEFAULT_DEPARTMENT_DESCRIPTION)
            .validate()
            .is_ok());
    }
}
