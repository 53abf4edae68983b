//! Shared building blocks for the user API workspace.
//!
//! - `validation`: rule engine, failure types and the injectable message catalog.
//! - `responses`: the success/error envelope and the field-error aggregator.
//! - `errors`: stable error-code trait for domain errors.
//! - `utils::logging`: tracing subscriber setup.

pub mod errors;
pub mod responses;
pub mod types;
pub mod utils;
pub mod validation;
