//! Page handlers.
//!
//! Each handler takes the shared [`AppState`] plus the routed request and
//! its path bindings. Request-scoped helpers live here.

pub mod articles;
pub mod auth;
pub mod pages;
pub mod users;

use axum::body::Body;
use axum::extract::FromRequest;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Form;
use serde::de::DeserializeOwned;

use crate::app::views::{self, PageContext};
use crate::app::{auth as session_auth, AppState};
use crate::http::response::html;
use crate::routing::{PathParams, UrlResolver};
use crate::session::Session;

/// Links and current user for rendering.
pub(crate) fn page_context(state: &AppState, req: &Request<Body>) -> PageContext {
    let urls = req
        .extensions()
        .get::<UrlResolver>()
        .cloned()
        .unwrap_or_default();
    let session = Session::from_request(req);
    PageContext {
        urls,
        user: session_auth::current_user(&state.users, session.as_ref()),
    }
}

/// Decode a urlencoded form body.
///
/// An undecodable body renders the bad request page with the rejection's
/// status; the rejection text only goes to the log.
pub(crate) async fn read_form<T>(ctx: &PageContext, req: Request<Body>) -> Result<T, Response>
where
    T: DeserializeOwned + Send,
{
    match Form::<T>::from_request(req, &()).await {
        Ok(Form(form)) => Ok(form),
        Err(rejection) => {
            let status = rejection.status();
            tracing::warn!(status = %status, error = %rejection, "Rejected form submission");
            Err(html(status, views::bad_request(ctx)))
        }
    }
}

/// The `id` binding as a number. Route constraints guarantee digits, but a
/// value too large for `u64` still fails here.
pub(crate) fn record_id(params: &PathParams) -> Option<u64> {
    params.parse("id")
}

pub(crate) fn not_found(ctx: &PageContext) -> Response {
    html(StatusCode::NOT_FOUND, views::not_found(ctx))
}

pub(crate) fn server_error(ctx: &PageContext) -> Response {
    html(StatusCode::INTERNAL_SERVER_ERROR, views::server_error(ctx))
}
