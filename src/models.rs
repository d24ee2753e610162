use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum length of a stored phone number, hyphen included
pub const NUMBER_MIN_LENGTH: usize = 8;

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,3}-)?\d+$").expect("Failed to compile phone number regex")
});

/// A phonebook entry as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub number: String,
}

/// Request body for POST /api/persons and PUT /api/persons/{id}
///
/// Both fields are optional at the wire level so that a missing field is
/// reported as a validation failure rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub number: Option<String>,
}

/// Name and number that passed validation and may be written to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub number: String,
}

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule a contact payload broke, reported together
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Person validation failed: {}", join_field_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ContactPayload {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }

    /// Apply the contact field rules
    ///
    /// `name` must be present and non-empty. `number` must be present, at
    /// least [`NUMBER_MIN_LENGTH`] characters long and look like `12-345678`
    /// or `123-45678` (the leading group is optional).
    pub fn validate(&self) -> Result<ContactFields, ValidationError> {
        let mut errors = Vec::new();

        let name = match self.name.as_deref() {
            Some(name) if !name.is_empty() => Some(name),
            _ => {
                errors.push(FieldError {
                    field: "name",
                    message: "Path `name` is required.".to_string(),
                });
                None
            }
        };

        let number = match self.number.as_deref() {
            None | Some("") => {
                errors.push(FieldError {
                    field: "number",
                    message: "Path `number` is required.".to_string(),
                });
                None
            }
            Some(number) if number.chars().count() < NUMBER_MIN_LENGTH => {
                errors.push(FieldError {
                    field: "number",
                    message: format!(
                        "Path `number` (`{}`) is shorter than the minimum allowed length ({}).",
                        number, NUMBER_MIN_LENGTH
                    ),
                });
                None
            }
            Some(number) if !NUMBER_PATTERN.is_match(number) => {
                errors.push(FieldError {
                    field: "number",
                    message: format!("`{}` is not a valid phone number", number),
                });
                None
            }
            Some(number) => Some(number),
        };

        match (name, number) {
            (Some(name), Some(number)) => Ok(ContactFields {
                name: name.to_string(),
                number: number.to_string(),
            }),
            _ => Err(ValidationError { errors }),
        }
    }
}

impl ContactFields {
    pub fn into_contact(self, id: String) -> Contact {
        Contact {
            id,
            name: self.name,
            number: self.number,
        }
    }
}
