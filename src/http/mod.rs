//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower layers, static assets)
//!     → request.rs (request ID, tracing span)
//!     → middleware/ (trailing slash → force HTML → session)
//!     → [routing dispatcher picks handler]
//!     → response.rs (HTML pages, redirects)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
