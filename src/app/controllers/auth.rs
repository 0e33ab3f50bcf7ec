//! Registration, login and logout.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use crate::app::auth::{self, AuthError};
use crate::app::controllers::{page_context, read_form, server_error};
use crate::app::forms::{FieldErrors, LoginForm, RegistrationForm};
use crate::app::models::StoreError;
use crate::app::views;
use crate::app::AppState;
use crate::http::response::{html, redirect};
use crate::routing::PathParams;
use crate::session::Session;

pub async fn register(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    html(
        StatusCode::OK,
        views::register(&ctx, &RegistrationForm::default(), &FieldErrors::new()),
    )
}

fn add_error(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

pub async fn do_register(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let session = Session::from_request(&req);
    let form: RegistrationForm = match read_form(&ctx, req).await {
        Ok(form) => form,
        Err(page) => return page,
    };

    let mut errors = form.check().err().unwrap_or_default();
    if !errors.contains_key("name") && state.users.name_taken(&form.name) {
        add_error(&mut errors, "name", "name is already taken".into());
    }
    if !errors.contains_key("email") && state.users.email_taken(&form.email) {
        add_error(&mut errors, "email", "email is already registered".into());
    }
    if !errors.is_empty() {
        return html(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::register(&ctx, &form, &errors),
        );
    }

    let created = state
        .users
        .create(&form.name, &form.email, &form.password)
        .await;
    let user = match created {
        Ok(user) => user,
        Err(StoreError::Duplicate { field, value }) => {
            add_error(&mut errors, field, format!("{} '{}' is already taken", field, value));
            return html(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::register(&ctx, &form, &errors),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            return server_error(&ctx);
        }
    };

    if let Err(e) = auth::login(session.as_ref(), &user) {
        tracing::error!(error = %e, "Login after registration failed");
        return server_error(&ctx);
    }
    redirect(&ctx.urls.name_to_url("home", &[]))
}

pub async fn login(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    html(StatusCode::OK, views::login(&ctx, "", None))
}

pub async fn do_login(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let session = Session::from_request(&req);
    let form: LoginForm = match read_form(&ctx, req).await {
        Ok(form) => form,
        Err(page) => return page,
    };

    let attempt = auth::attempt(&state.users, session.as_ref(), &form.email, &form.password);
    match attempt.await {
        Ok(_) => redirect(&ctx.urls.name_to_url("home", &[])),
        Err(e @ (AuthError::UnknownAccount | AuthError::IncorrectPassword)) => html(
            StatusCode::OK,
            views::login(&ctx, &form.email, Some(&e.to_string())),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            server_error(&ctx)
        }
    }
}

pub async fn logout(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    auth::logout(Session::from_request(&req).as_ref());
    redirect(&ctx.urls.name_to_url("home", &[]))
}
