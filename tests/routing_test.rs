//! Route table, reverse resolution and dispatch through the public API.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use blog_server::app::routes::register_web_routes;
use blog_server::routing::{Dispatcher, PathParams, ResolveError, RouteError, RouteTable};
use blog_server::{AppState, Application};

mod common;
use common::{body_string, test_config};

fn web_table() -> RouteTable {
    let state = AppState::in_memory(&test_config());
    let mut table = RouteTable::new();
    register_web_routes(&mut table, &state).unwrap();
    table
}

#[test]
fn test_show_route_round_trip() {
    let table = web_table();
    let resolver = table.resolver();

    let url = resolver.resolve("articles.show", &["id", "42"]).unwrap();
    assert_eq!(url, "/articles/42");

    let (route, params) = table.lookup(&Method::GET, &url).unwrap();
    assert_eq!(route.name(), "articles.show");
    assert_eq!(params.get("id"), Some("42"));
}

#[test]
fn test_same_path_different_methods() {
    let table = web_table();

    let (route, _) = table.lookup(&Method::GET, "/articles").unwrap();
    assert_eq!(route.name(), "articles.index");
    let (route, _) = table.lookup(&Method::POST, "/articles").unwrap();
    assert_eq!(route.name(), "articles.store");

    let (route, _) = table.lookup(&Method::POST, "/articles/7").unwrap();
    assert_eq!(route.name(), "articles.update");

    assert!(table.lookup(&Method::DELETE, "/articles/7").is_none());
    assert!(table.lookup(&Method::GET, "/auth/logout").is_none());
}

#[test]
fn test_every_named_route_resolves() {
    let table = web_table();
    let resolver = table.resolver();

    for route in table.routes() {
        let url = resolver.name_to_url(route.name(), &["id", "3"]);
        assert!(!url.is_empty(), "{} did not resolve", route.name());
        let (found, _) = table.lookup(route.method(), &url).unwrap();
        assert_eq!(found.pattern().as_str(), route.pattern().as_str());
    }
}

#[test]
fn test_resolution_failures() {
    let resolver = web_table().resolver();

    assert_eq!(
        resolver.resolve("articles.show", &["id"]),
        Err(ResolveError::InvalidArgumentCount(1))
    );
    assert!(matches!(
        resolver.resolve("articles.show", &[]),
        Err(ResolveError::MissingParameter { .. })
    ));
    assert!(matches!(
        resolver.resolve("articles.show", &["id", "abc"]),
        Err(ResolveError::ConstraintViolation { .. })
    ));
    assert_eq!(
        resolver.resolve("nope", &[]),
        Err(ResolveError::UnknownRoute("nope".into()))
    );
    assert_eq!(resolver.name_to_url("articles.show", &[]), "");
}

#[test]
fn test_extra_keys_are_ignored() {
    let resolver = web_table().resolver();
    assert_eq!(
        resolver.resolve("articles.edit", &["page", "2", "id", "5"]).unwrap(),
        "/articles/5/edit"
    );
}

#[test]
fn test_registering_twice_fails() {
    let state = AppState::in_memory(&test_config());
    let mut table = RouteTable::new();
    register_web_routes(&mut table, &state).unwrap();

    let err = register_web_routes(&mut table, &state).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRouteName(name) if name == "home"));
}

#[test]
fn test_application_builds() {
    let config = test_config();
    let app = Application::build(&config, AppState::in_memory(&config)).unwrap();
    assert_eq!(app.dispatcher().table().len(), 15);
    assert_eq!(
        app.middleware().names(),
        vec!["remove_trailing_slash", "force_html", "start_session"]
    );
}

#[tokio::test]
async fn test_dispatcher_uses_custom_not_found() {
    let mut table = RouteTable::new();
    table
        .get("home", "/", |_req: Request<Body>, _params: PathParams| async { "home" })
        .unwrap();
    let dispatcher = Dispatcher::new(table).with_not_found(
        |_req: Request<Body>, _params: PathParams| async { (StatusCode::NOT_FOUND, "custom") },
    );

    let req = Request::builder().uri("/missing").body(Body::empty()).unwrap();
    let response = dispatcher.dispatch(req).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "custom");
}
