//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router hosting the application endpoint
//! - Serve static assets under `/css` and `/js`
//! - Wire up tower layers (tracing, request ID, limits, timeout, panics)
//! - Bind server to listener and drain on shutdown

use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use axum::http::{HeaderValue, Request};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::BlogConfig;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::routing::Endpoint;

/// HTTP server for the blog.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server whose every non-asset request enters `endpoint`.
    pub fn new(config: &BlogConfig, endpoint: Endpoint) -> Self {
        Self {
            router: Self::build_router(config, endpoint),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BlogConfig, endpoint: Endpoint) -> Router {
        let public = Path::new(&config.assets.public_dir);
        let app = move |req: Request<Body>| {
            let endpoint = endpoint.clone();
            async move { endpoint(req).await }
        };

        let mut router = Router::new()
            .nest_service("/css", ServeDir::new(public.join("css")))
            .nest_service("/js", ServeDir::new(public.join("js")))
            .fallback(app)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(CatchPanicLayer::new());

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ));
        }

        router
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
