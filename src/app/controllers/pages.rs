use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use crate::app::controllers::page_context;
use crate::app::views;
use crate::app::AppState;
use crate::http::response::html;
use crate::routing::PathParams;

pub async fn about(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    html(StatusCode::OK, views::about(&ctx))
}

/// Fallback for requests no route matched.
pub async fn not_found(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    tracing::debug!(path = %req.uri().path(), "Rendering not-found page");
    super::not_found(&ctx)
}
