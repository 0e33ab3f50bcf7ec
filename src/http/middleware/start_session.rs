//! Session start middleware.
//!
//! Resumes the session named by the request cookie (or starts one), exposes
//! it to inner handlers through the request extensions, and flushes it back
//! to the store when the inner chain finishes. The flush is tied to a
//! [`SessionGuard`], so it also happens if the handler panics or the request
//! is dropped by the timeout layer.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, Request};
use axum::response::Response;
use cookie::{Cookie, SameSite};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::config::SessionConfig;
use crate::http::middleware::{Middleware, Next};
use crate::session::{Session, SessionGuard, SessionStore};

/// Starts or resumes a session around each request.
#[derive(Clone)]
pub struct StartSession {
    store: Arc<dyn SessionStore>,
    cookie_name: Arc<str>,
    secure: bool,
}

impl StartSession {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            cookie_name: config.cookie_name.as_str().into(),
            secure: config.secure_cookie,
        }
    }

    fn session_id(&self, req: &Request<Body>) -> Option<String> {
        req.headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == &*self.cookie_name)
            .map(|c| c.value().to_string())
    }

    fn resume_or_start(&self, req: &Request<Body>) -> Session {
        match self.session_id(req) {
            Some(id) => match self.store.load(&id) {
                Some(data) => Session::resume(&id, data),
                None => {
                    tracing::debug!(session = %id, "Unknown session id, starting a new session");
                    Session::start()
                }
            },
            None => Session::start(),
        }
    }

    fn set_cookie(&self, response: &mut Response, session: &Session) {
        let cookie = Cookie::build((self.cookie_name.to_string(), session.id()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build();

        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie header"),
        }
    }
}

impl Middleware for StartSession {
    fn name(&self) -> &'static str {
        "start_session"
    }

    fn handle(&self, mut req: Request<Body>, next: Next) -> BoxFuture<'static, Response> {
        let this = self.clone();
        async move {
            let session = this.resume_or_start(&req);
            req.extensions_mut().insert(session.clone());

            let guard = SessionGuard::new(session.clone(), this.store.clone());
            let mut response = next.run(req).await;

            if session.needs_cookie() {
                this.set_cookie(&mut response, &session);
            }
            drop(guard);
            response
        }
        .boxed()
    }
}
