//! Service layer holding the user registration workflow.
//! - Separates business logic from data access (repository trait).
//! - Builds entities from the validated value objects in `domain`.
//! - Errors carry stable codes for the HTTP layer.

pub mod users;
#[cfg(test)]
pub mod test_support;
