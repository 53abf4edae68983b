use std::error::Error as StdError;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::responses::{ErrorResponse, ErrorType};
use common::validation::{ValidationError, ValidationFailure};
use service::users::UserError;
use thiserror::Error;
use tracing::{debug, error};

/// Field reported when a body error has no better location.
const BODY_FIELD: &str = "Body";
const JSON_VALUE_CODE: &str = "JsonValueValidator";

/// Handler failure. Envelopes go to the client as-is; internal errors are
/// logged and answered with a bare 500.
#[derive(Debug)]
pub enum ApiError {
    Envelope(ErrorResponse),
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::Envelope(ErrorResponse::from_validation(value.failures()))
    }
}

/// A body the extractor could not read is reported like any other invalid
/// input, on the field the deserializer stopped at.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let (field, message) = rejected_field(&rejection);
        debug!(event = "json_body_rejected", field = %field, error = %message, "request body rejected");
        let failure = ValidationFailure::new(field, JSON_VALUE_CODE, message);
        ApiError::Envelope(ErrorResponse::from_validation(&[failure]))
    }
}

fn rejected_field(rejection: &JsonRejection) -> (String, String) {
    let mut source = rejection.source();
    while let Some(err) = source {
        if let Some(e) = err.downcast_ref::<serde_path_to_error::Error<serde_json::Error>>() {
            let path = e.path().to_string();
            let field = if path == "." { BODY_FIELD.to_string() } else { path };
            return (field, e.inner().to_string());
        }
        source = err.source();
    }
    (BODY_FIELD.to_string(), rejection.body_text())
}

impl From<UserError> for ApiError {
    fn from(value: UserError) -> Self {
        match value {
            UserError::DuplicatedEmail => {
                ApiError::Envelope(ErrorResponse::from_coded_error("Email", ErrorType::BusinessLogicFailed, &value))
            }
            UserError::NotFound => ApiError::Envelope(ErrorResponse::not_found(value.to_string())),
            UserError::Hashing(_) | UserError::Repository(_) => ApiError::Internal(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Envelope(e) => e.into_response(),
            ApiError::Internal(msg) => {
                error!(error = %msg, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
