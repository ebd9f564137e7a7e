//! Job listing schema
//!
//! The ingest service expects every listing to carry the same ten attributes.

use serde_json::{Map, Value};
use std::fmt;

/// A job listing as sent to the ingest service. Keys beyond the schema are
/// passed through untouched.
pub type JobListing = Map<String, Value>;

/// One of the ten required job listing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaField {
    Title,
    EmploymentType,
    Employer,
    Expires,
    JobSalary,
    SalaryType,
    JobLocation,
    LocationType,
    ResidentialAddress,
    JobRoles,
}

impl SchemaField {
    pub const COUNT: usize = 10;

    /// All fields in display order.
    pub const ALL: [SchemaField; Self::COUNT] = [
        SchemaField::Title,
        SchemaField::EmploymentType,
        SchemaField::Employer,
        SchemaField::Expires,
        SchemaField::JobSalary,
        SchemaField::SalaryType,
        SchemaField::JobLocation,
        SchemaField::LocationType,
        SchemaField::ResidentialAddress,
        SchemaField::JobRoles,
    ];

    /// The key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            SchemaField::Title => "Title",
            SchemaField::EmploymentType => "Employment Type",
            SchemaField::Employer => "Employer",
            SchemaField::Expires => "Expires",
            SchemaField::JobSalary => "Job Salary",
            SchemaField::SalaryType => "Salary Type",
            SchemaField::JobLocation => "Job Location",
            SchemaField::LocationType => "Location Type",
            SchemaField::ResidentialAddress => "Residential Address",
            SchemaField::JobRoles => "Job Roles",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// True when `value` is an object holding every schema key (values unchecked).
pub fn has_all_fields(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) => SchemaField::ALL.iter().all(|f| obj.contains_key(f.key())),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_round_trip() {
        for field in SchemaField::ALL {
            assert_eq!(SchemaField::from_key(field.key()), Some(field));
            assert_eq!(SchemaField::ALL[field.index()], field);
        }
        assert_eq!(SchemaField::from_key("Salary"), None);
    }

    #[test]
    fn test_has_all_fields_checks_presence_only() {
        let mut listing = JobListing::new();
        for field in SchemaField::ALL {
            listing.insert(field.key().to_string(), Value::Null);
        }
        assert!(has_all_fields(&Value::Object(listing.clone())));

        listing.remove("Job Roles");
        assert!(!has_all_fields(&Value::Object(listing)));
        assert!(!has_all_fields(&json!("Title")));
        assert!(!has_all_fields(&Value::Null));
    }
}
