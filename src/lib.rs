//! Blog web server library.
//!
//! Routing core (route table, dispatcher, reverse URL resolver), the
//! middleware chain, sessions, and the blog application built on them.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;

pub use app::{AppState, Application};
pub use config::schema::BlogConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
