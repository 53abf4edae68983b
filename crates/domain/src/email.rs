use std::fmt;

use common::validation::{MessageCatalog, RuleSet, ValidationError, ValidationFailure};
use serde::Serialize;

/// Lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 320;
    const FIELD: &'static str = "Email";

    /// Normalizes, then validates.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let value = Self::normalize(raw);
        let failures = Self::check_normalized(Self::FIELD, &value, &MessageCatalog::default());
        match ValidationError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Self(value)),
        }
    }

    pub fn normalize(raw: &str) -> String {
        raw.to_lowercase()
    }

    /// Email rules reported under `field`; `raw` is normalized first.
    pub fn check(field: &str, raw: &str, catalog: &MessageCatalog) -> Vec<ValidationFailure> {
        Self::check_normalized(field, &Self::normalize(raw), catalog)
    }

    fn check_normalized(field: &str, value: &str, catalog: &MessageCatalog) -> Vec<ValidationFailure> {
        RuleSet::new(field, catalog)
            .not_empty(value)
            .max_length(value, Self::MAX_LENGTH)
            .email_address(value)
            .into_failures()
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use common::validation::RuleCode;

    use super::*;

    #[test]
    fn lowercases_before_validation() {
        let email = Email::new("USER@Example.COM").unwrap();
        assert_eq!(email.value(), "user@example.com");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Email::new("MiXeD@Case.Org").unwrap();
        let twice = Email::new(once.value()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_email_reports_every_failing_rule() {
        let err = Email::new("").unwrap_err();
        assert!(err.violates(RuleCode::NotEmpty));
        assert!(err.violates(RuleCode::EmailAddress));
        assert!(!err.violates(RuleCode::MaximumLength));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["plain", "@host", "user@", "a@b@c"] {
            let err = Email::new(raw).unwrap_err();
            assert!(err.violates(RuleCode::EmailAddress), "{raw}");
        }
    }

    #[test]
    fn enforces_max_length() {
        let local = "a".repeat(Email::MAX_LENGTH - "@x.io".len());
        assert!(Email::new(&format!("{local}@x.io")).is_ok());
        let err = Email::new(&format!("{local}b@x.io")).unwrap_err();
        assert!(err.violates(RuleCode::MaximumLength));
    }

    #[test]
    fn check_normalizes_too() {
        assert!(Email::check("Login", "USER@HOST", &MessageCatalog::default()).is_empty());
    }
}
