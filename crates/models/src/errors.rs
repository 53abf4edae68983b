use common::validation::ValidationError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("stored value failed validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    /// A required column came back NULL, or similar broken assumptions.
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("no column conversion registered for {0}")]
    UnregisteredConversion(&'static str),
}
