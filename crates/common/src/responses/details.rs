//! Field-grouped error details for the error envelope.

use serde::{Deserialize, Serialize};

use super::{ErrorResponse, ErrorType};
use crate::errors::HasErrorCode;
use crate::validation::ValidationFailure;

/// Top-level message for every request rejected by validation.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation Failed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldErrors {
    pub field: String,
    pub errors: Vec<ErrorDetail>,
}

/// Group failures by field.
///
/// Groups appear in the order their field was first seen; inside a group the
/// original failure order is kept.
pub fn group_failures(failures: &[ValidationFailure]) -> Vec<FieldErrors> {
    let mut groups: Vec<FieldErrors> = Vec::new();
    for failure in failures {
        let detail = ErrorDetail { code: failure.code.clone(), message: failure.message.clone() };
        match groups.iter_mut().find(|g| g.field == failure.field) {
            Some(group) => group.errors.push(detail),
            None => groups.push(FieldErrors { field: failure.field.clone(), errors: vec![detail] }),
        }
    }
    groups
}

impl ErrorResponse {
    /// Error-with-details envelope for a failed validation.
    pub fn from_validation(failures: &[ValidationFailure]) -> Self {
        Self {
            error_type: ErrorType::ValidationFailed,
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            errors: Some(group_failures(failures)),
        }
    }

    /// Wrap one coded domain error as a single field error.
    pub fn from_coded_error<E>(field: impl Into<String>, error_type: ErrorType, err: &E) -> Self
    where
        E: HasErrorCode + ?Sized,
    {
        let message = err.to_string();
        Self {
            error_type,
            errors: Some(vec![FieldErrors {
                field: field.into(),
                errors: vec![ErrorDetail { code: err.code().to_string(), message: message.clone() }],
            }]),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use serde_json::json;

    use super::*;

    fn failure(field: &str, code: &str) -> ValidationFailure {
        ValidationFailure::new(field, code, format!("{field} {code}"))
    }

    #[test]
    fn groups_by_first_seen_field_preserving_order() {
        let groups = group_failures(&[failure("Name", "A"), failure("Name", "B"), failure("Email", "C")]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].field, "Name");
        let codes: Vec<_> = groups[0].errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
        assert_eq!(groups[1].field, "Email");
        assert_eq!(groups[1].errors.len(), 1);
        assert_eq!(groups[1].errors[0].code, "C");
    }

    #[test]
    fn interleaved_fields_still_group() {
        let groups = group_failures(&[failure("A", "1"), failure("B", "2"), failure("A", "3")]);
        let fields: Vec<_> = groups.iter().map(|g| g.field.as_str()).collect();
        assert_eq!(fields, vec!["A", "B"]);
        assert_eq!(groups[0].errors.len(), 2);
        assert_eq!(groups[0].errors[1].code, "3");
    }

    #[test]
    fn empty_failures_give_empty_groups() {
        assert!(group_failures(&[]).is_empty());
    }

    #[test]
    fn validation_envelope_shape() {
        let resp = ErrorResponse::from_validation(&[ValidationFailure::new(
            "Email",
            "EmailValidator",
            "Must be a valid email address.",
        )]);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "IsSuccess": false,
                "Type": "ValidationFailed",
                "Message": "Validation Failed.",
                "Errors": [
                    { "Field": "Email", "Errors": [ { "Code": "EmailValidator", "Message": "Must be a valid email address." } ] }
                ]
            })
        );
    }

    struct Taken;

    impl fmt::Display for Taken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Email already taken.")
        }
    }

    impl HasErrorCode for Taken {
        fn code(&self) -> &str {
            "DuplicatedUserEmailExc"
        }
    }

    #[test]
    fn coded_error_becomes_single_field_group() {
        let resp = ErrorResponse::from_coded_error("Email", ErrorType::BusinessLogicFailed, &Taken);
        assert_eq!(resp.message, "Email already taken.");
        assert_eq!(resp.error_type, ErrorType::BusinessLogicFailed);
        let groups = resp.errors.expect("details");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].field, "Email");
        assert_eq!(groups[0].errors[0].code, "DuplicatedUserEmailExc");
        assert_eq!(groups[0].errors[0].message, "Email already taken.");
    }
}
