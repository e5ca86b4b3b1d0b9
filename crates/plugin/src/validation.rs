//! Field-scoped configuration validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration problem tied to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Configuration key the problem belongs to.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of validating a plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// True when `errors` is empty.
    pub valid: bool,
    /// Collected problems, in the order they were found.
    #[serde(default)]
    pub errors: Vec<ValidationError>,
}

impl ValidateResponse {
    /// Errors reported for one field.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.field == field)
    }
}

/// Accumulates validation errors.
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<ValidationError>,
}

impl ValidationBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    /// Whether any error has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finishes validation.
    #[must_use]
    pub fn build(self) -> ValidateResponse {
        ValidateResponse {
            valid: self.errors.is_empty(),
            errors: self.errors,
        }
    }
}
