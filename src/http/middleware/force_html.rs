//! Force an HTML content type on every dispatched response.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Request};
use axum::response::Response;

use crate::http::middleware::Next;

pub const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";

/// Overwrites whatever content type the handler chose. Does not inspect or
/// block the request.
pub async fn force_html(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML_UTF8));
    response
}
