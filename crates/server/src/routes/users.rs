use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::responses::SuccessResponse;
use common::validation::{MessageCatalog, ValidationResult};
use domain::{CreatedAt, Email, Entity, Id, Password};
use serde::{Deserialize, Deserializer, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::request_validation::RequestValidator;
use crate::state::AppState;

pub const USERS_PATH: &str = "/api/v1/users";
pub const USER_PATH: &str = "/api/v1/users/:id";

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct RegisterUserRequest {
    #[serde(alias = "email", deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(alias = "password", deserialize_with = "null_as_empty")]
    pub password: String,
}

/// `null` reads like an absent field: an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RegisteredUser {
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserView {
    #[schema(value_type = String)]
    pub id: Id,
    #[schema(value_type = String)]
    pub email: Email,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: CreatedAt,
}

/// Field rules for registration, rendered with the configured catalog.
pub struct RegisterUserRequestValidator {
    catalog: Arc<MessageCatalog>,
}

impl RegisterUserRequestValidator {
    pub fn new(catalog: Arc<MessageCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl RequestValidator<RegisterUserRequest> for RegisterUserRequestValidator {
    async fn validate(&self, request: &RegisterUserRequest, _cancel: &CancellationToken) -> ValidationResult {
        let mut result = ValidationResult::valid();
        result.extend(Email::check("Email", &request.email, &self.catalog));
        result.extend(Password::check("Password", &request.password, &self.catalog));
        result
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Registered; Location points at the new user", body = RegisteredUser),
        (status = 400, description = "ValidationFailed or BusinessLogicFailed envelope")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = payload?;
    // The gate has already run; constructors still guard the values.
    let email = Email::new(&input.email)?;
    let password = Password::new(input.password)?;

    let user = state.users.register(email, password).await?;
    let location = format!("{USERS_PATH}/{}", user.id());
    let body = SuccessResponse::created(
        "Registered user successfully.",
        RegisteredUser { id: user.id().value().to_string() },
    );
    Ok(([(header::LOCATION, location)], body).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "RetrieveDataSuccess envelope", body = UserView),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "NotFound envelope")
    )
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<SuccessResponse<UserView>, ApiError> {
    let id = Id::new(id)?;
    let user = state.users.get(&id).await?;
    Ok(SuccessResponse::retrieved(
        "Retrieved user successfully.",
        UserView { id: user.id().clone(), email: user.email().clone(), created_at: user.created_at() },
    ))
}
