//! Request classification and identification.
//!
//! # Responsibilities
//! - Tag every request with `IsRestRequest`
//! - Generate and propagate `x-request-id`
//! - Record per-request metrics
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Classification runs for every request, REST or not

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::observability::metrics;
use crate::routing::{Matcher, RestRequestMatcher};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request extension: whether the path is a REST API path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsRestRequest(pub bool);

/// Access to the request ID set by [`set_request_id_layer`].
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Assigns a UUID v4 request ID unless the client sent one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Marks REST API requests for downstream handlers.
pub async fn rest_request_listener(mut request: Request<Body>, next: Next) -> Response {
    let is_rest = RestRequestMatcher.matches(&request);
    tracing::trace!(
        request_id = %request.request_id(),
        path = %request.uri().path(),
        is_rest,
        "Request classified"
    );
    request.extensions_mut().insert(IsRestRequest(is_rest));
    next.run(request).await
}

/// Records request count and latency.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
