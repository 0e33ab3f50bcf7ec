//! Request identification.
//!
//! # Responsibilities
//! - Generate a UUID request ID for every request that lacks one
//! - Echo it on the response
//! - Make it available to the tracing span of the request
//!
//! # Design Decisions
//! - Request ID is assigned by the outermost layer so every log line for the
//!   request carries it

use axum::body::Body;
use axum::http::{HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Read the request ID off a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(&X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
    }
}

pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Span for one HTTP request, tagged with its ID.
pub fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %req.request_id().unwrap_or("unknown"),
        method = %req.method(),
        uri = %req.uri(),
    )
}
