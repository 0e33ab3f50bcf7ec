//! Request lifecycle middleware.
//!
//! # Data Flow
//! ```text
//! Request
//!     → remove_trailing_slash (normalize path)
//!     → force_html (content type on the way out)
//!     → start_session (resume/start, flush on exit)
//!     → Dispatcher
//! ```

pub mod chain;
pub mod force_html;
pub mod start_session;
pub mod trailing_slash;

pub use chain::{from_fn, FnMiddleware, Middleware, MiddlewareChain, Next};
pub use force_html::force_html;
pub use start_session::StartSession;
pub use trailing_slash::remove_trailing_slash;
