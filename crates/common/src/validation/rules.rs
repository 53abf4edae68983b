use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

use super::messages::MessageCatalog;
use super::{ValidationError, ValidationFailure};

/// Stable identifiers of the built-in rules, as reported in error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCode {
    NotEmpty,
    MinimumLength,
    MaximumLength,
    EmailAddress,
    LessThanOrEqual,
    Predicate,
}

impl RuleCode {
    pub const ALL: [RuleCode; 6] = [
        RuleCode::NotEmpty,
        RuleCode::MinimumLength,
        RuleCode::MaximumLength,
        RuleCode::EmailAddress,
        RuleCode::LessThanOrEqual,
        RuleCode::Predicate,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RuleCode::NotEmpty => "NotEmptyValidator",
            RuleCode::MinimumLength => "MinimumLengthValidator",
            RuleCode::MaximumLength => "MaximumLengthValidator",
            RuleCode::EmailAddress => "EmailValidator",
            RuleCode::LessThanOrEqual => "LessThanOrEqualValidator",
            RuleCode::Predicate => "PredicateValidator",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }
}

/// Length of a string in Unicode scalar values.
///
/// All length rules in this workspace count `char`s, so an emoji counts as one.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

// Exactly one '@', with something on both sides.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@]+@[^@]+$").unwrap_or_else(|e| panic!("email regex failed to compile: {e}"))
});

/// Collects rule failures for a single field.
///
/// ```
/// use common::validation::{MessageCatalog, RuleSet};
///
/// let catalog = MessageCatalog::default();
/// let failures = RuleSet::new("Name", &catalog)
///     .not_empty("  ")
///     .max_length("  ", 10)
///     .into_failures();
/// assert_eq!(failures.len(), 1);
/// assert_eq!(failures[0].code, "NotEmptyValidator");
/// ```
pub struct RuleSet<'a> {
    field: &'a str,
    catalog: &'a MessageCatalog,
    failures: Vec<ValidationFailure>,
}

impl<'a> RuleSet<'a> {
    pub fn new(field: &'a str, catalog: &'a MessageCatalog) -> Self {
        Self { field, catalog, failures: Vec::new() }
    }

    /// Fails on empty or whitespace-only input.
    pub fn not_empty(self, value: &str) -> Self {
        if value.trim().is_empty() {
            self.fail(RuleCode::NotEmpty, &[])
        } else {
            self
        }
    }

    pub fn min_length(self, value: &str, min: usize) -> Self {
        let total = char_len(value);
        if total < min {
            self.fail(
                RuleCode::MinimumLength,
                &[("MinLength", min.to_string()), ("TotalLength", total.to_string())],
            )
        } else {
            self
        }
    }

    pub fn max_length(self, value: &str, max: usize) -> Self {
        let total = char_len(value);
        if total > max {
            self.fail(
                RuleCode::MaximumLength,
                &[("MaxLength", max.to_string()), ("TotalLength", total.to_string())],
            )
        } else {
            self
        }
    }

    pub fn email_address(self, value: &str) -> Self {
        if EMAIL_RE.is_match(value) {
            self
        } else {
            self.fail(RuleCode::EmailAddress, &[])
        }
    }

    /// Fails when `value > bound`. `message` replaces the catalog template.
    pub fn less_than_or_equal<T>(self, value: &T, bound: &T, message: Option<&str>) -> Self
    where
        T: PartialOrd + Display,
    {
        if value <= bound {
            return self;
        }
        match message {
            Some(m) => self.fail_with(RuleCode::LessThanOrEqual, m.to_string()),
            None => self.fail(RuleCode::LessThanOrEqual, &[("ComparisonValue", bound.to_string())]),
        }
    }

    /// Generic predicate rule with a caller supplied message.
    pub fn must(self, condition: bool, message: &str) -> Self {
        if condition {
            self
        } else {
            self.fail_with(RuleCode::Predicate, message.to_string())
        }
    }

    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        match ValidationError::from_failures(self.failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(self, code: RuleCode, args: &[(&str, String)]) -> Self {
        let message = self.catalog.render(code, args);
        self.fail_with(code, message)
    }

    fn fail_with(mut self, code: RuleCode, message: String) -> Self {
        self.failures.push(ValidationFailure::new(self.field, code.as_str(), message));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MessageCatalog {
        MessageCatalog::default()
    }

    #[test]
    fn codes_round_trip_through_parse() {
        for code in RuleCode::ALL {
            assert_eq!(RuleCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(RuleCode::parse("nope"), None);
    }

    #[test]
    fn whitespace_only_is_empty() {
        let c = catalog();
        let failures = RuleSet::new("Id", &c).not_empty(" \t ").into_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "Must not be empty.");
    }

    #[test]
    fn all_rules_run_and_keep_order() {
        let c = catalog();
        let failures = RuleSet::new("Email", &c)
            .not_empty("")
            .max_length("", 10)
            .email_address("")
            .into_failures();
        let codes: Vec<_> = failures.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["NotEmptyValidator", "EmailValidator"]);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let c = catalog();
        // 8 chars, 20+ bytes
        let value = "こんにちは🌟世界";
        assert!(RuleSet::new("Id", &c).max_length(value, 8).finish().is_ok());
        let err = RuleSet::new("Id", &c).max_length(value, 7).finish().unwrap_err();
        assert_eq!(
            err.failures()[0].message,
            "The length must be 7 characters or fewer. You entered 8 characters."
        );
    }

    #[test]
    fn min_length_reports_both_lengths() {
        let c = catalog();
        let err = RuleSet::new("Password", &c).min_length("abc", 6).finish().unwrap_err();
        assert_eq!(
            err.failures()[0].message,
            "The length must be at least 6 characters. You entered 3 characters."
        );
    }

    #[test]
    fn email_grammar() {
        let c = catalog();
        for ok in ["a@b", "user@example.com", "first.last+tag@sub.example.org"] {
            assert!(RuleSet::new("Email", &c).email_address(ok).finish().is_ok(), "{ok}");
        }
        for bad in ["", "plain", "@example.com", "user@", "a@b@c"] {
            assert!(RuleSet::new("Email", &c).email_address(bad).finish().is_err(), "{bad}");
        }
    }

    #[test]
    fn comparison_uses_custom_message_when_given() {
        let c = catalog();
        let err = RuleSet::new("CreatedAt", &c)
            .less_than_or_equal(&5, &3, Some("cannot be in the future."))
            .finish()
            .unwrap_err();
        assert_eq!(err.failures()[0].message, "cannot be in the future.");
        assert_eq!(err.failures()[0].code, "LessThanOrEqualValidator");

        let err = RuleSet::new("Age", &c).less_than_or_equal(&5, &3, None).finish().unwrap_err();
        assert_eq!(err.failures()[0].message, "Must be less than or equal to '3'.");
    }

    #[test]
    fn must_uses_predicate_code() {
        let c = catalog();
        let err = RuleSet::new("Value", &c).must(false, "must be UTC.").finish().unwrap_err();
        assert!(err.violates(RuleCode::Predicate));
        assert!(RuleSet::new("Value", &c).must(true, "unused").finish().is_ok());
    }

    #[test]
    fn catalog_overrides_apply_to_rules() {
        let c = MessageCatalog::default().with_override(RuleCode::NotEmpty, "{Field} is required");
        let failures = RuleSet::new("Id", &c).not_empty("").into_failures();
        assert_eq!(failures[0].message, "{Field} is required");
    }
}
