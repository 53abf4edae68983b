pub mod users;

use std::sync::Arc;

use anyhow::anyhow;
use axum::handler::Handler;
use axum::http::Method;
use axum::middleware;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::{Json, Router};
use common::types::Health;
use serde::de::DeserializeOwned;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use crate::request_validation::{attach_cancellation, validate_request, RequestValidationGate};
use crate::state::AppState;
use users::{RegisterUserRequest, RegisterUserRequestValidator};

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// One row of the route table.
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    route: MethodRouter<AppState>,
}

impl Endpoint {
    pub fn new<H, T>(method: Method, path: &'static str, handler: H) -> anyhow::Result<Self>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|e| anyhow!("unsupported method {method} for {path}: {e}"))?;
        Ok(Self { method, path, route: on(filter, handler) })
    }

    /// Run `gate` before the handler.
    pub fn with_request_validation<T>(mut self, gate: RequestValidationGate<T>) -> Self
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.route = self.route.route_layer(middleware::from_fn_with_state(gate, validate_request::<T>));
        self
    }
}

/// The application's route table.
pub fn endpoints(state: &AppState) -> anyhow::Result<Vec<Endpoint>> {
    let register_gate: RequestValidationGate<RegisterUserRequest> =
        RequestValidationGate::new(Arc::new(RegisterUserRequestValidator::new(Arc::clone(&state.catalog))));

    Ok(vec![
        Endpoint::new(Method::GET, "/health", health)?,
        Endpoint::new(Method::GET, "/api-docs/openapi.json", openapi_json)?,
        Endpoint::new(Method::POST, users::USERS_PATH, users::register)?.with_request_validation(register_gate),
        Endpoint::new(Method::GET, users::USER_PATH, users::get_by_id)?,
    ])
}

/// Build the full application router from the route table
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    build_router_from(endpoints(&state)?, state)
}

pub fn build_router_from(endpoints: Vec<Endpoint>, state: AppState) -> anyhow::Result<Router> {
    let shutdown = state.shutdown.clone();
    let mut router = Router::new();
    for endpoint in endpoints {
        info!(event = "route_registered", method = %endpoint.method, path = endpoint.path, "route registered");
        router = router.route(endpoint.path, endpoint.route);
    }

    Ok(router
        .with_state(state)
        .layer(middleware::from_fn_with_state(shutdown, attach_cancellation))
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        ))
}
