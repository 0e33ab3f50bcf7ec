//! Response helpers shared by the page handlers.

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::middleware::force_html::TEXT_HTML_UTF8;

/// An HTML page with the given status.
pub fn html(status: StatusCode, body: String) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML_UTF8))],
        body,
    )
        .into_response()
}

/// `302 Found` pointing at `location`.
///
/// An empty location (a failed reverse lookup) falls back to `/`.
pub fn redirect(location: &str) -> Response {
    let target = if location.is_empty() { "/" } else { location };
    match HeaderValue::from_str(target) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location = %target, error = %e, "Invalid redirect target");
            (StatusCode::FOUND, [(LOCATION, HeaderValue::from_static("/"))]).into_response()
        }
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
