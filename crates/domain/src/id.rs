use std::fmt;

use common::validation::{MessageCatalog, RuleSet, ValidationError, ValidationFailure};
use serde::Serialize;
use uuid::Uuid;

/// Entity identifier. Any non-blank string of at most 255 characters;
/// freshly generated ids are UUID v4 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub const MAX_LENGTH: usize = 255;
    const FIELD: &'static str = "Id";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let failures = Self::check(Self::FIELD, &value, &MessageCatalog::default());
        match ValidationError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Self(value)),
        }
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Id rules reported under `field`.
    pub fn check(field: &str, value: &str, catalog: &MessageCatalog) -> Vec<ValidationFailure> {
        RuleSet::new(field, catalog)
            .not_empty(value)
            .max_length(value, Self::MAX_LENGTH)
            .into_failures()
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use common::validation::RuleCode;

    use super::*;

    #[test]
    fn generated_ids_are_distinct_uuids() {
        let ids: HashSet<String> = (0..1000).map(|_| Id::default().into_inner()).collect();
        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert!(Uuid::parse_str(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn blank_ids_fail_not_empty() {
        for raw in ["", "   ", "\t\n"] {
            let err = Id::new(raw).unwrap_err();
            assert!(err.violates(RuleCode::NotEmpty), "{raw:?}");
            assert_eq!(err.failures()[0].field, "Id");
        }
    }

    #[test]
    fn length_bound_is_in_chars() {
        assert!(Id::new("x".repeat(255)).is_ok());
        let err = Id::new("x".repeat(256)).unwrap_err();
        assert!(err.violates(RuleCode::MaximumLength));
        assert_eq!(
            err.failures()[0].message,
            "The length must be 255 characters or fewer. You entered 256 characters."
        );
        // 255 multi-byte chars still fit.
        assert!(Id::new("é".repeat(255)).is_ok());
    }

    #[test]
    fn accepts_any_non_blank_text() {
        let id = Id::new("user-42/ü").unwrap();
        assert_eq!(id.value(), "user-42/ü");
        assert_eq!(id, Id::new("user-42/ü").unwrap());
    }

    #[test]
    fn check_uses_caller_field_name() {
        let failures = Id::check("UserId", "", &MessageCatalog::default());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "UserId");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = Id::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
