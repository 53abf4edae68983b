//! UTC timestamps.
//!
//! Inputs arrive tagged as UTC, local or unspecified and are converted to UTC
//! before any rule runs:
//! - UTC passes through;
//! - local is converted with the system time zone rules;
//! - unspecified keeps the same wall clock reading and is tagged UTC.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, Offset, Utc};
use common::validation::{MessageCatalog, RuleSet, ValidationError, ValidationFailure};
use serde::Serialize;

/// A timestamp together with how its offset should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggedDateTime {
    Utc(DateTime<Utc>),
    Local(DateTime<Local>),
    Unspecified(NaiveDateTime),
}

impl TaggedDateTime {
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            TaggedDateTime::Utc(dt) => dt,
            TaggedDateTime::Local(dt) => dt.with_timezone(&Utc),
            TaggedDateTime::Unspecified(naive) => naive.and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for TaggedDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        TaggedDateTime::Utc(value)
    }
}

impl From<DateTime<Local>> for TaggedDateTime {
    fn from(value: DateTime<Local>) -> Self {
        TaggedDateTime::Local(value)
    }
}

impl From<NaiveDateTime> for TaggedDateTime {
    fn from(value: NaiveDateTime) -> Self {
        TaggedDateTime::Unspecified(value)
    }
}

const MUST_BE_UTC: &str = "must be UTC.";
const NOT_IN_FUTURE: &str = "cannot be in the future.";

fn is_utc(value: &DateTime<Utc>) -> bool {
    value.offset().fix().local_minus_utc() == 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UtcDateTime(DateTime<Utc>);

impl UtcDateTime {
    const FIELD: &'static str = "UtcDateTime";

    pub fn new(value: impl Into<TaggedDateTime>) -> Result<Self, ValidationError> {
        Self::build(value.into(), true)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn convert_to_utc(value: impl Into<TaggedDateTime>) -> DateTime<Utc> {
        value.into().to_utc()
    }

    /// Converts first; the base UTC rule only runs when `should_validate` is set,
    /// so specializations can apply their own rule set instead.
    pub(crate) fn build(value: TaggedDateTime, should_validate: bool) -> Result<Self, ValidationError> {
        let value = value.to_utc();
        if should_validate {
            let failures = Self::check(Self::FIELD, &value, &MessageCatalog::default());
            if let Some(err) = ValidationError::from_failures(failures) {
                return Err(err);
            }
        }
        Ok(Self(value))
    }

    pub fn check(field: &str, value: &DateTime<Utc>, catalog: &MessageCatalog) -> Vec<ValidationFailure> {
        RuleSet::new(field, catalog).must(is_utc(value), MUST_BE_UTC).into_failures()
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for UtcDateTime {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Creation timestamp; UTC and never later than the moment it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CreatedAt(UtcDateTime);

impl CreatedAt {
    const FIELD: &'static str = "CreatedAt";

    pub fn new(value: impl Into<TaggedDateTime>) -> Result<Self, ValidationError> {
        let converted = UtcDateTime::build(value.into(), false)?;
        let failures = Self::check(Self::FIELD, &converted.value(), &MessageCatalog::default());
        match ValidationError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Self(converted)),
        }
    }

    pub fn now() -> Self {
        Self(UtcDateTime::now())
    }

    pub fn check(field: &str, value: &DateTime<Utc>, catalog: &MessageCatalog) -> Vec<ValidationFailure> {
        RuleSet::new(field, catalog)
            .must(is_utc(value), MUST_BE_UTC)
            .less_than_or_equal(value, &Utc::now(), Some(NOT_IN_FUTURE))
            .into_failures()
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0.value()
    }

    pub fn as_utc_date_time(&self) -> UtcDateTime {
        self.0
    }
}

impl Default for CreatedAt {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone};
    use common::validation::RuleCode;

    use super::*;

    #[test]
    fn utc_passes_through() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(UtcDateTime::new(dt).unwrap().value(), dt);
    }

    #[test]
    fn local_converts_to_same_instant() {
        let local = Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).earliest().unwrap();
        let converted = UtcDateTime::new(local).unwrap();
        assert_eq!(converted.value(), local.with_timezone(&Utc));
        assert_eq!(converted.value().timestamp(), local.timestamp());
    }

    #[test]
    fn unspecified_keeps_clock_reading() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        let converted = UtcDateTime::new(naive).unwrap();
        assert_eq!(converted.value(), Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn default_is_now() {
        let before = Utc::now();
        let value = UtcDateTime::default().value();
        let after = Utc::now();
        assert!(before <= value && value <= after);
    }

    #[test]
    fn created_at_default_is_bracketed_by_now() {
        let before = Utc::now();
        let created = CreatedAt::default();
        let after = Utc::now();
        assert!(before <= created.value());
        assert!(created.value() <= after);
        assert!(CreatedAt::new(created.value()).is_ok());
    }

    #[test]
    fn default_constructors_never_precede_the_clock() {
        for _ in 0..10_000 {
            let before = Utc::now();
            let created = CreatedAt::default();
            let at = UtcDateTime::default();
            let after = Utc::now();
            assert!(before <= created.value() && created.value() <= after);
            assert!(before <= at.value() && at.value() <= after);
        }
    }

    #[test]
    fn created_at_rejects_future() {
        let err = CreatedAt::new(Utc::now() + Duration::hours(1)).unwrap_err();
        assert!(err.violates(RuleCode::LessThanOrEqual));
        assert_eq!(err.failures()[0].field, "CreatedAt");
        assert_eq!(err.failures()[0].message, "cannot be in the future.");
    }

    #[test]
    fn created_at_accepts_past_local_input() {
        let local = Local.with_ymd_and_hms(2020, 6, 1, 8, 30, 0).earliest().unwrap();
        let created = CreatedAt::new(local).unwrap();
        assert_eq!(created.value(), local.with_timezone(&Utc));
    }
}
