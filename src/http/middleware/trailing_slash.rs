//! Trailing slash normalization.
//!
//! Runs outermost so routing and sessions only ever see normalized paths.
//! Exactly one trailing `/` is removed; the root path `/` is left alone and
//! the query string is preserved.

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};
use axum::response::Response;

use crate::http::middleware::Next;

/// Normalized form of `path`, or `None` if it is already normalized.
pub fn normalize(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    path.strip_suffix('/')
}

fn rewrite(uri: &Uri) -> Option<Uri> {
    let trimmed = normalize(uri.path())?;
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", trimmed, query),
        None => trimmed.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

pub async fn remove_trailing_slash(mut req: Request<Body>, next: Next) -> Response {
    if let Some(uri) = rewrite(req.uri()) {
        tracing::trace!(from = %req.uri(), to = %uri, "Stripped trailing slash");
        *req.uri_mut() = uri;
    }
    next.run(req).await
}
