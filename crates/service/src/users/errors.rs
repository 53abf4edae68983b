use common::errors::HasErrorCode;
use thiserror::Error;

/// Business errors for user workflows
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Email already taken.")]
    DuplicatedEmail,
    #[error("User not found.")]
    NotFound,
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl HasErrorCode for UserError {
    /// Stable code for external mapping/logging
    fn code(&self) -> &str {
        match self {
            UserError::DuplicatedEmail => "DuplicatedUserEmailExc",
            UserError::NotFound => "UserNotFoundExc",
            UserError::Hashing(_) => "PasswordHashingExc",
            UserError::Repository(_) => "RepositoryExc",
        }
    }
}

impl From<models::ModelError> for UserError {
    fn from(value: models::ModelError) -> Self {
        match value {
            models::ModelError::Validation(v) => UserError::Repository(format!("stored user is invalid: {v}")),
            other => UserError::Repository(other.to_string()),
        }
    }
}
