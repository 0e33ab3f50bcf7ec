//! Article pages driven through the full middleware and routing stack.

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Method, Request, StatusCode};

mod common;
use common::{body_string, get, post_form, send, test_app};

#[tokio::test]
async fn test_empty_title_is_rejected_without_write() {
    let (router, state) = test_app();

    let response = send(&router, post_form("/articles", "title=&body=", None)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_string(response).await;
    assert!(body.contains("title is required"));
    assert!(body.contains("body is required"));
    assert!(state.articles.is_empty());
}

#[tokio::test]
async fn test_invalid_form_keeps_submitted_values() {
    let (router, state) = test_app();

    let response = send(
        &router,
        post_form("/articles", "title=Hi&body=long+enough+body", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_string(response).await;
    assert!(body.contains("title must be between 3 and 40 characters"));
    assert!(body.contains("long enough body"));
    assert!(!body.contains("body must be"));
    assert!(state.articles.is_empty());
}

#[tokio::test]
async fn test_undecodable_body_renders_bad_request_page() {
    let (router, state) = test_app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/articles")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"Hello","body":"Fifteen chars!!"}"#))
        .unwrap();
    let response = send(&router, req).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");

    let body = body_string(response).await;
    assert!(body.contains("<h1>Bad request</h1>"));
    assert!(body.contains("</html>"));
    assert!(!body.contains("Content-Type"));
    assert!(state.articles.is_empty());
}

#[tokio::test]
async fn test_create_then_show() {
    let (router, _state) = test_app();

    let response = send(
        &router,
        post_form("/articles", "title=Hello&body=Fifteen+chars!!", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/articles/1");
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");

    let response = send(&router, get("/articles/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<h1>Hello</h1>"));
    assert!(body.contains("Fifteen chars!!"));
    assert!(body.contains(r#"action="/articles/1/delete""#));
    assert!(body.contains(r#"href="/articles/1/edit""#));
}

#[tokio::test]
async fn test_index_lists_articles_with_links() {
    let (router, state) = test_app();
    state.articles.create("First", "The first article", None);
    state.articles.create("Second", "The second article", None);

    for uri in ["/", "/articles"] {
        let body = body_string(send(&router, get(uri)).await).await;
        let first = body.find(r#"<a href="/articles/1">First</a>"#).unwrap();
        let second = body.find(r#"<a href="/articles/2">Second</a>"#).unwrap();
        assert!(first < second);
    }
}

#[tokio::test]
async fn test_create_form_is_not_shadowed_by_show() {
    let (router, _state) = test_app();

    let response = send(&router, get("/articles/create")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("New article"));
    assert!(body.contains(r#"action="/articles""#));
}

#[tokio::test]
async fn test_edit_and_update() {
    let (router, state) = test_app();
    let article = state.articles.create("Original", "Original body text", None);

    let body = body_string(send(&router, get("/articles/1/edit")).await).await;
    assert!(body.contains(r#"value="Original""#));
    assert!(body.contains(r#"action="/articles/1""#));

    let response = send(&router, post_form("/articles/1", "title=Up&body=short", None)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(state.articles.get(article.id).unwrap().title, "Original");

    let response = send(
        &router,
        post_form("/articles/1", "title=Updated&body=Updated+body+text", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/articles/1");
    assert_eq!(state.articles.get(article.id).unwrap().title, "Updated");
}

#[tokio::test]
async fn test_delete() {
    let (router, state) = test_app();
    state.articles.create("Doomed", "About to be deleted", None);

    let response = send(&router, post_form("/articles/1/delete", "", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/articles");
    assert!(state.articles.is_empty());

    let response = send(&router, post_form("/articles/1/delete", "", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_article_is_404_page() {
    let (router, _state) = test_app();

    for req in [
        get("/articles/42"),
        get("/articles/42/edit"),
        post_form("/articles/42", "title=Valid&body=Valid+body+text", None),
    ] {
        let response = send(&router, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("404"));
    }
}

#[tokio::test]
async fn test_non_numeric_id_falls_to_not_found() {
    let (router, _state) = test_app();

    let response = send(&router, get("/articles/abc")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
}

#[tokio::test]
async fn test_user_page_lists_their_articles() {
    let (router, state) = test_app();
    let user = state
        .users
        .create("alice", "alice@example.com", "secret1")
        .await
        .unwrap();
    state.articles.create("Mine", "Written by alice", Some(user.id));
    state.articles.create("Theirs", "Written by nobody", None);

    let body = body_string(send(&router, get("/users/1")).await).await;
    assert!(body.contains("<h1>alice</h1>"));
    assert!(body.contains("Mine"));
    assert!(!body.contains("Theirs"));

    let response = send(&router, get("/users/9")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
