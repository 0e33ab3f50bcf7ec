//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use blog_server::{AppState, Application, BlogConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// Defaults with a cheap bcrypt cost and the repository's asset directory.
pub fn test_config() -> BlogConfig {
    let mut config = BlogConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.security.bcrypt_cost = 4;
    config.assets.public_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").into();
    config
}

/// The fully layered router plus handles on its stores.
pub fn test_app() -> (Router, AppState) {
    let config = test_config();
    let state = AppState::in_memory(&config);
    let application = Application::build(&config, state.clone()).expect("routes build");
    let server = HttpServer::new(&config, application.into_endpoint());
    (server.router(), state)
}

pub async fn send(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` of the first `Set-Cookie` header, ready to send back.
pub fn session_cookie(response: &Response) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(str::to_string)
}

/// Serve the blog on an ephemeral port.
pub async fn spawn_server() -> (SocketAddr, Shutdown, JoinHandle<()>) {
    let config = test_config();
    let state = AppState::in_memory(&config);
    let application = Application::build(&config, state).expect("routes build");
    let server = HttpServer::new(&config, application.into_endpoint());

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });
    (addr, shutdown, handle)
}
