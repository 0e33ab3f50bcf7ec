//! Request dispatch.
//!
//! Consults the frozen [`RouteTable`], invokes the matched handler with its
//! bindings, or falls back to the not-found handler. Before the handler
//! runs, the table's [`UrlResolver`] is attached to the request extensions
//! so handlers can build links without reaching for global state.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;

use crate::observability::metrics;
use crate::routing::handler::{BoxHandler, Endpoint, Handler};
use crate::routing::params::PathParams;
use crate::routing::reverse::UrlResolver;
use crate::routing::router::RouteTable;

async fn default_not_found(_req: Request<Body>, _params: PathParams) -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

/// Routes requests to handlers.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    resolver: UrlResolver,
    not_found: BoxHandler,
}

impl Dispatcher {
    /// Freeze `table` and build a dispatcher over it.
    pub fn new(table: RouteTable) -> Self {
        let resolver = table.resolver();
        Self {
            table: Arc::new(table),
            resolver,
            not_found: Arc::new(default_not_found),
        }
    }

    /// Replace the handler invoked when no route matches.
    pub fn with_not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = Arc::new(handler);
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    /// Dispatch one request.
    pub async fn dispatch(&self, mut req: Request<Body>) -> Response {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        req.extensions_mut().insert(self.resolver.clone());

        match self.table.lookup(&method, &path) {
            Some((route, params)) => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    route = %route.name(),
                    "Route matched"
                );
                let handler = route.handler().clone();
                let response = handler.call(req, params).await;
                metrics::record_request(
                    method.as_str(),
                    route.name(),
                    response.status().as_u16(),
                    start,
                );
                response
            }
            None => {
                tracing::debug!(method = %method, path = %path, "No route matched");
                metrics::record_not_found(method.as_str());
                self.not_found.call(req, PathParams::new()).await
            }
        }
    }

    /// Innermost endpoint for the middleware chain.
    pub fn into_endpoint(self) -> Endpoint {
        let dispatcher = Arc::new(self);
        Arc::new(move |req: Request<Body>| {
            let dispatcher = dispatcher.clone();
            async move { dispatcher.dispatch(req).await }.boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn dispatcher() -> Dispatcher {
        let mut table = RouteTable::new();
        table
            .get(
                "articles.show",
                "/articles/{id:[0-9]+}",
                |_req: Request<Body>, params: PathParams| async move {
                    format!("show {}", params.get("id").unwrap_or_default())
                },
            )
            .unwrap();
        table
            .get("links", "/links", |req: Request<Body>, _params: PathParams| async move {
                req.extensions()
                    .get::<UrlResolver>()
                    .map(|r| r.name_to_url("articles.show", &["id", "7"]))
                    .unwrap_or_default()
            })
            .unwrap();
        Dispatcher::new(table).with_not_found(|_req: Request<Body>, _params: PathParams| async {
            (StatusCode::NOT_FOUND, "custom not found")
        })
    }

    #[tokio::test]
    async fn test_dispatch_match() {
        let d = dispatcher();
        let response = d.dispatch(request(Method::GET, "/articles/42")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "show 42");
    }

    #[tokio::test]
    async fn test_dispatch_not_found() {
        let d = dispatcher();
        let response = d.dispatch(request(Method::GET, "/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "custom not found");

        // Method mismatch is a plain miss as well
        let response = d.dispatch(request(Method::POST, "/articles/42")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resolver_attached_to_request() {
        let d = dispatcher();
        let response = d.dispatch(request(Method::GET, "/links")).await;
        assert_eq!(body_string(response).await, "/articles/7");
    }

    #[tokio::test]
    async fn test_default_not_found() {
        let d = Dispatcher::new(RouteTable::new());
        let response = d.dispatch(request(Method::GET, "/")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
