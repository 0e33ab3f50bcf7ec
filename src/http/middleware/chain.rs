//! Middleware composition.
//!
//! A middleware wraps an inner endpoint and produces an outer one. Given
//! `[M1, M2, M3]` in registration order the composed endpoint is
//! `M1(M2(M3(endpoint)))`: M1 sees the request first and the response last.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::routing::Endpoint;

/// The rest of the chain, as seen from inside one middleware.
#[derive(Clone)]
pub struct Next {
    inner: Endpoint,
}

impl Next {
    pub fn new(inner: Endpoint) -> Self {
        Self { inner }
    }

    /// Hand the request to the remaining chain.
    pub async fn run(self, req: Request<Body>) -> Response {
        (self.inner)(req).await
    }
}

/// A request-wrapping behaviour.
pub trait Middleware: Send + Sync + 'static {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn handle(&self, req: Request<Body>, next: Next) -> BoxFuture<'static, Response>;
}

/// Adapter turning an `async fn(Request, Next) -> Response` into a middleware.
pub struct FnMiddleware<F> {
    name: &'static str,
    f: F,
}

/// Build a middleware from an async function or closure.
pub fn from_fn<F, Fut>(name: &'static str, f: F) -> FnMiddleware<F>
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    FnMiddleware { name, f }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(&self, req: Request<Body>, next: Next) -> BoxFuture<'static, Response> {
        (self.f)(req, next).boxed()
    }
}

/// Ordered list of middlewares, fixed at startup.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware; it nests inside every one added before it.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Compose the chain around `endpoint`.
    pub fn wrap(&self, endpoint: Endpoint) -> Endpoint {
        self.layers.iter().rev().fold(endpoint, |inner, middleware| {
            let middleware = middleware.clone();
            let outer: Endpoint = Arc::new(move |req: Request<Body>| {
                middleware.handle(req, Next::new(inner.clone()))
            });
            outer
        })
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
