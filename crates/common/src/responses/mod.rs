//! Uniform response envelope for every API endpoint.
//!
//! Wire shape (PascalCase keys, kinds serialized by name):
//!
//! ```text
//! { "IsSuccess": true,  "Type": "CreateSuccess",    "Message": "...", "Data": {...} }
//! { "IsSuccess": false, "Type": "ValidationFailed", "Message": "...", "Errors": [...] }
//! ```
//!
//! `IsSuccess` is never stored, it is derived from which variant is serialized.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize, Serializer};

pub mod details;

pub use details::{group_failures, ErrorDetail, FieldErrors, VALIDATION_FAILED_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessType {
    RetrieveDataSuccess,
    CreateSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    NotFound,
    ValidationFailed,
    BusinessLogicFailed,
}

impl ErrorType {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::ValidationFailed | ErrorType::BusinessLogicFailed => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResponse<T> {
    pub success_type: SuccessType,
    pub message: String,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self { success_type: SuccessType::CreateSuccess, message: message.into(), data }
    }

    pub fn retrieved(message: impl Into<String>, data: T) -> Self {
        Self { success_type: SuccessType::RetrieveDataSuccess, message: message.into(), data }
    }
}

/// Error envelope. `errors` is `Some` for the "with details" shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub errors: Option<Vec<FieldErrors>>,
}

impl ErrorResponse {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self { error_type, message: message.into(), errors: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorType::NotFound, message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(SuccessResponse<T>),
    Error(ErrorResponse),
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ApiResponse::Success(s) => &s.message,
            ApiResponse::Error(e) => &e.message,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success(s) => Some(&s.data),
            ApiResponse::Error(_) => None,
        }
    }
}

impl<T> From<SuccessResponse<T>> for ApiResponse<T> {
    fn from(value: SuccessResponse<T>) -> Self {
        ApiResponse::Success(value)
    }
}

impl<T> From<ErrorResponse> for ApiResponse<T> {
    fn from(value: ErrorResponse) -> Self {
        ApiResponse::Error(value)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SuccessWire<'a, T> {
    is_success: bool,
    #[serde(rename = "Type")]
    kind: SuccessType,
    message: &'a str,
    data: &'a T,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorWire<'a> {
    is_success: bool,
    #[serde(rename = "Type")]
    kind: ErrorType,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldErrors]>,
}

impl<T: Serialize> Serialize for SuccessResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SuccessWire { is_success: true, kind: self.success_type, message: &self.message, data: &self.data }
            .serialize(serializer)
    }
}

impl Serialize for ErrorResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorWire {
            is_success: false,
            kind: self.error_type,
            message: &self.message,
            errors: self.errors.as_deref(),
        }
        .serialize(serializer)
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Success(s) => s.serialize(serializer),
            ApiResponse::Error(e) => e.serialize(serializer),
        }
    }
}

impl<T: Serialize> IntoResponse for SuccessResponse<T> {
    fn into_response(self) -> Response {
        let status = match self.success_type {
            SuccessType::CreateSuccess => StatusCode::CREATED,
            SuccessType::RetrieveDataSuccess => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.error_type.status_code(), Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Success(s) => s.into_response(),
            ApiResponse::Error(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Debug, Clone, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Created {
        id: String,
    }

    #[test]
    fn success_serializes_with_derived_flag_and_named_kind() {
        let resp = SuccessResponse::created("Registered user successfully.", Created { id: "abc".into() });
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "IsSuccess": true,
                "Type": "CreateSuccess",
                "Message": "Registered user successfully.",
                "Data": { "Id": "abc" }
            })
        );
    }

    #[test]
    fn plain_error_has_no_errors_or_data() {
        let resp = ErrorResponse::not_found("User not found.");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({ "IsSuccess": false, "Type": "NotFound", "Message": "User not found." }));
        assert!(value.get("Data").is_none());
    }

    #[test]
    fn envelope_discriminant_drives_flag() {
        let ok: ApiResponse<u8> = SuccessResponse::retrieved("ok", 1).into();
        let err: ApiResponse<u8> = ErrorResponse::new(ErrorType::BusinessLogicFailed, "nope").into();
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&1));
        assert!(!err.is_success());
        assert_eq!(err.data(), None);
        assert_eq!(err.message(), "nope");

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["IsSuccess"], json!(false));
        assert_eq!(value["Type"], json!("BusinessLogicFailed"));
    }

    #[test]
    fn kinds_deserialize_from_names() {
        let kind: ErrorType = serde_json::from_str("\"ValidationFailed\"").unwrap();
        assert_eq!(kind, ErrorType::ValidationFailed);
        let kind: SuccessType = serde_json::from_str("\"RetrieveDataSuccess\"").unwrap();
        assert_eq!(kind, SuccessType::RetrieveDataSuccess);
    }

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(ErrorResponse::not_found("x").into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorResponse::new(ErrorType::ValidationFailed, "x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SuccessResponse::created("x", ()).into_response().status(),
            StatusCode::CREATED
        );
        assert_eq!(
            SuccessResponse::retrieved("x", ()).into_response().status(),
            StatusCode::OK
        );
    }
}
