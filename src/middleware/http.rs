//! HTTP-level middleware (cross-cutting, applies to every route).
//!
//! - request id generation + propagation (`x-request-id`)
//! - access log (TraceLayer)
//! - request body limit
//! - global timeout
//! - panic → 500 JSON body (the request future unwinds first, so
//!   request-scoped context is already torn down)

use std::{any::Any, time::Duration};

use axum::Json;
use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use axum::response::{IntoResponse, Response};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, ErrorResponse};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn apply(router: Router) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            handle_layer_error(err)
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CatchPanicLayer::custom(panic_response));

    router.layer(layers)
}

fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        let body = ErrorResponse {
            message: "Request timed out".to_string(),
            status: StatusCode::REQUEST_TIMEOUT.as_u16(),
            error: "REQUEST_TIMEOUT",
        };
        (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        AppError::Internal.into_response()
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, "request handler panicked");

    AppError::Internal.into_response()
}
