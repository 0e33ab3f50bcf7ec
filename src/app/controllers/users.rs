use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use crate::app::controllers::{not_found, page_context, record_id};
use crate::app::views;
use crate::app::AppState;
use crate::http::response::html;
use crate::routing::PathParams;

/// A user's profile page with their articles.
pub async fn show(state: AppState, req: Request<Body>, params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let Some(user) = record_id(&params).and_then(|id| state.users.get(id).ok()) else {
        return not_found(&ctx);
    };
    let articles = state.articles.by_user(user.id);
    html(StatusCode::OK, views::user_show(&ctx, &user, &articles))
}
