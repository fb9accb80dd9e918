use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single failed form check, keyed by the field it applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Client-side form checks that failed. Never sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("please correct the following: {}", summarize(.errors))]
pub struct InputValidationError {
    pub errors: Vec<FieldError>,
}

impl InputValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects field errors and turns them into a result once all checks ran.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn extend(&mut self, errors: Vec<FieldError>) -> &mut Self {
        self.errors.extend(errors);
        self
    }

    pub fn finish(&mut self) -> Result<(), InputValidationError> {
        if self.errors.is_empty() {
            return Ok(());
        }

        Err(InputValidationError {
            errors: std::mem::take(&mut self.errors),
        })
    }
}

/// Trimmed location text of at least three characters.
pub fn is_valid_location(value: &str) -> bool {
    value.trim().chars().count() >= 3
}
