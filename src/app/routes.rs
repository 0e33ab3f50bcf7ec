//! Web route registration.
//!
//! Names follow `resource.action`. Order matters where patterns overlap:
//! `/articles/create` is only reachable because the `articles.show` id
//! constraint rejects `create`.

use std::future::Future;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::app::controllers::{articles, auth, pages, users};
use crate::app::AppState;
use crate::routing::{Handler, PathParams, RouteError, RouteTable};

/// Bind a state-taking page handler into a route handler.
pub fn with_state<F, Fut>(state: &AppState, f: F) -> impl Handler
where
    F: Fn(AppState, Request<Body>, PathParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let state = state.clone();
    move |req: Request<Body>, params: PathParams| f(state.clone(), req, params)
}

pub fn register_web_routes(table: &mut RouteTable, state: &AppState) -> Result<(), RouteError> {
    table.get("home", "/", with_state(state, articles::index))?;
    table.get("about", "/about", with_state(state, pages::about))?;

    table.get("articles.index", "/articles", with_state(state, articles::index))?;
    table.get("articles.show", "/articles/{id:[0-9]+}", with_state(state, articles::show))?;
    table.get("articles.create", "/articles/create", with_state(state, articles::create))?;
    table.post("articles.store", "/articles", with_state(state, articles::store))?;
    table.get("articles.edit", "/articles/{id:[0-9]+}/edit", with_state(state, articles::edit))?;
    table.post("articles.update", "/articles/{id:[0-9]+}", with_state(state, articles::update))?;
    table.post(
        "articles.delete",
        "/articles/{id:[0-9]+}/delete",
        with_state(state, articles::delete),
    )?;

    table.get("users.show", "/users/{id:[0-9]+}", with_state(state, users::show))?;

    table.get("auth.register", "/auth/register", with_state(state, auth::register))?;
    table.post("auth.doregister", "/auth/do-register", with_state(state, auth::do_register))?;
    table.get("auth.login", "/auth/login", with_state(state, auth::login))?;
    table.post("auth.dologin", "/auth/dologin", with_state(state, auth::do_login))?;
    table.post("auth.logout", "/auth/logout", with_state(state, auth::logout))?;

    tracing::info!(routes = table.len(), "Web routes registered");
    Ok(())
}
