//! The handler capability.
//!
//! Every route target is a value implementing [`Handler`]: something that
//! takes the request plus its path bindings and produces a response. Plain
//! `async fn`s and closures qualify through the blanket impl below.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::routing::params::PathParams;

/// A route target.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>, params: PathParams) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    fn call(&self, req: Request<Body>, params: PathParams) -> BoxFuture<'static, Response> {
        (self)(req, params).map(IntoResponse::into_response).boxed()
    }
}

/// Shared, type-erased handler as stored in the route table.
pub type BoxHandler = Arc<dyn Handler>;

/// A fully routed request entry point: no bindings yet, just the request.
///
/// The dispatcher is turned into one of these, and every middleware wraps
/// one into another.
pub type Endpoint = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn created(_req: Request<Body>, params: PathParams) -> (StatusCode, String) {
        (StatusCode::CREATED, format!("id={}", params.get("id").unwrap_or("?")))
    }

    #[tokio::test]
    async fn test_async_fn_is_a_handler() {
        let handler: BoxHandler = Arc::new(created);
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = handler.call(req, PathParams::default()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
