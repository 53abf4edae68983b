//! Request validation gate.
//!
//! Runs the validator registered for a request type before the handler. An
//! invalid request is answered with a `ValidationFailed` envelope and the
//! handler never runs; a valid one is passed on and the handler's response
//! is returned untouched. Validation may be cancelled through the request's
//! cancellation token, which aborts the request. The token is a child of the
//! server's shutdown token, attached by [`attach_cancellation`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use common::responses::ErrorResponse;
use common::validation::ValidationResult;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound for buffering a body to validate it.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Validates a request model of type `T`.
#[async_trait]
pub trait RequestValidator<T: Sync>: Send + Sync {
    async fn validate(&self, request: &T, cancel: &CancellationToken) -> ValidationResult;
}

/// Why the gate stopped a request.
#[derive(Debug)]
pub enum GateRejection {
    Invalid(ErrorResponse),
    Cancelled,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            GateRejection::Invalid(e) => e.into_response(),
            GateRejection::Cancelled => StatusCode::REQUEST_TIMEOUT.into_response(),
        }
    }
}

pub struct RequestValidationGate<T: Sync> {
    validator: Option<Arc<dyn RequestValidator<T>>>,
}

impl<T: Sync> Clone for RequestValidationGate<T> {
    fn clone(&self) -> Self {
        Self { validator: self.validator.clone() }
    }
}

impl<T: Sync> RequestValidationGate<T> {
    pub fn new(validator: Arc<dyn RequestValidator<T>>) -> Self {
        Self { validator: Some(validator) }
    }

    /// Gate without a validator; every request passes through.
    pub fn disabled() -> Self {
        Self { validator: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.validator.is_some()
    }

    /// Validate `request`, then run `next` only if it is valid.
    pub async fn intercept<F, Fut, R>(
        &self,
        request: &T,
        cancel: &CancellationToken,
        next: F,
    ) -> Result<R, GateRejection>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        if let Some(validator) = &self.validator {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GateRejection::Cancelled),
                result = validator.validate(request, cancel) => result,
            };
            if !result.is_valid() {
                debug!(
                    event = "request_validation_failed",
                    failures = result.failures().len(),
                    "request rejected by validator"
                );
                return Err(GateRejection::Invalid(ErrorResponse::from_validation(result.failures())));
            }
        }
        Ok(next().await)
    }
}

/// Puts a child of the shutdown token into every request's extensions.
pub async fn attach_cancellation(
    State(shutdown): State<CancellationToken>,
    mut req: Request,
    next: Next,
) -> Response {
    req.extensions_mut().insert(shutdown.child_token());
    next.run(req).await
}

/// Axum middleware wrapping a route with the gate for `T`.
///
/// The request model is taken from the request extensions when an earlier
/// layer put one there, otherwise it is parsed from the JSON body. A body
/// that does not parse is left to the handler's extractor to reject.
pub async fn validate_request<T>(
    State(gate): State<RequestValidationGate<T>>,
    req: Request,
    next: Next,
) -> Response
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    if !gate.is_enabled() {
        return next.run(req).await;
    }

    let cancel = req.extensions().get::<CancellationToken>().cloned().unwrap_or_default();
    let existing = req.extensions().get::<T>().cloned();
    let (model, req) = match existing {
        Some(model) => (model, req),
        None => {
            let (parts, body) = req.into_parts();
            let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "failed to buffer request body");
                    return StatusCode::PAYLOAD_TOO_LARGE.into_response();
                }
            };
            let parsed = serde_json::from_slice::<T>(&bytes);
            let req = Request::from_parts(parts, Body::from(bytes));
            match parsed {
                Ok(model) => (model, req),
                Err(_) => return next.run(req).await,
            }
        }
    };

    // Stops work the validator spawned with the token if the client goes away.
    let guard = cancel.clone().drop_guard();
    let outcome = gate.intercept(&model, &cancel, move || next.run(req)).await;
    guard.disarm();

    match outcome {
        Ok(response) => response,
        Err(rejection) => rejection.into_response(),
    }
}
