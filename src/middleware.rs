// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP middleware for the API router
//!
//! Applied outermost first:
//!
//! 1. `SetRequestIdLayer` assigns a UUID `x-request-id` unless the client sent one
//! 2. `TraceLayer` opens an `http_request` span carrying that id and logs
//!    one access line per response
//! 3. `PropagateRequestIdLayer` copies the id onto the response
//! 4. `CatchPanicLayer` turns a panicking handler into `500 {"error":"internal error"}`

use std::any::Any;

use axum::{
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, MakeSpan, TraceLayer},
};
use tracing::{error, Level, Span};

use crate::tracing::spans;

/// Header carrying the request correlation id
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Builds the `http_request` span from the method, path and request id
#[derive(Debug, Clone, Copy, Default)]
struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        spans::http_request(request.method().as_str(), request.uri().path(), request_id)
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = message, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}

/// Wraps `router` with request id, access logging and panic recovery layers
pub fn with_http_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(RequestSpan)
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}
