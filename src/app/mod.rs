//! The blog application.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     AppState (stores) → routes.rs registers every page → RouteTable
//!     → Dispatcher (404 page as fallback) → MiddlewareChain wraps it
//!
//! Request:
//!     remove_trailing_slash → force_html → start_session
//!     → Dispatcher → controllers/ → views.rs → HTML response
//! ```

pub mod auth;
pub mod controllers;
pub mod forms;
pub mod models;
pub mod password;
pub mod routes;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use crate::config::BlogConfig;
use crate::http::middleware::{
    force_html, from_fn, remove_trailing_slash, MiddlewareChain, StartSession,
};
use crate::routing::{Dispatcher, Endpoint, RouteError, RouteTable};
use crate::session::{MemoryStore, SessionStore};

use self::models::{ArticleStore, UserStore};

/// Shared handles every page handler receives.
#[derive(Clone)]
pub struct AppState {
    pub articles: ArticleStore,
    pub users: UserStore,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Fresh in-memory stores.
    pub fn in_memory(config: &BlogConfig) -> Self {
        let sessions = match config.session.idle_timeout_secs {
            0 => MemoryStore::new(),
            secs => MemoryStore::with_idle_timeout(Duration::from_secs(secs)),
        };
        Self {
            articles: ArticleStore::new(),
            users: UserStore::new(config.security.bcrypt_cost),
            sessions: Arc::new(sessions),
        }
    }
}

/// Route table, dispatcher and middleware, assembled and frozen.
pub struct Application {
    dispatcher: Dispatcher,
    middleware: MiddlewareChain,
}

impl Application {
    /// Register all routes and middleware. Fails on a bad route definition,
    /// which must abort startup.
    pub fn build(config: &BlogConfig, state: AppState) -> Result<Self, RouteError> {
        let mut table = RouteTable::new();
        routes::register_web_routes(&mut table, &state)?;

        let dispatcher = Dispatcher::new(table)
            .with_not_found(routes::with_state(&state, controllers::pages::not_found));

        let middleware = MiddlewareChain::new()
            .with(from_fn("remove_trailing_slash", remove_trailing_slash))
            .with(from_fn("force_html", force_html))
            .with(StartSession::new(state.sessions.clone(), &config.session));

        tracing::info!(middleware = ?middleware.names(), "Application assembled");
        Ok(Self {
            dispatcher,
            middleware,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// The composed request entry point.
    pub fn into_endpoint(self) -> Endpoint {
        self.middleware.wrap(self.dispatcher.into_endpoint())
    }
}
