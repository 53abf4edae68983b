//! Validation primitives shared by value objects and request validators.
//!
//! Rules are evaluated through [`RuleSet`], which renders messages from an
//! explicitly passed [`MessageCatalog`]. Every rule runs; failures are
//! collected rather than stopping at the first one.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub mod messages;
pub mod rules;

pub use messages::{CatalogError, Language, MessageCatalog};
pub use rules::{char_len, RuleCode, RuleSet};

/// One violated rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), code: code.into(), message: message.into() }
    }
}

/// Raised when a value object or request fails its rules. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    failures: Vec<ValidationFailure>,
}

impl ValidationError {
    /// Returns `None` when there is nothing to report.
    pub fn from_failures(failures: Vec<ValidationFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    pub fn single(field: impl Into<String>, code: RuleCode, message: impl Into<String>) -> Self {
        Self { failures: vec![ValidationFailure::new(field, code.as_str(), message)] }
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    /// Whether any failure was produced by `code`.
    pub fn violates(&self, code: RuleCode) -> bool {
        self.failures.iter().any(|f| f.code == code.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed:")?;
        for failure in &self.failures {
            write!(f, " {}: {} [{}];", failure.field, failure.message, failure.code)?;
        }
        Ok(())
    }
}

/// Outcome of running a composite validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn from_failures(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn extend(&mut self, failures: impl IntoIterator<Item = ValidationFailure>) {
        self.failures.extend(failures);
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match ValidationError::from_failures(self.failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
