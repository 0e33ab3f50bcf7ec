//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     register(name, pattern, method, handler)
//!     → matcher.rs (compile pattern: literals + constrained params)
//!     → router.rs (append to ordered table, reject duplicate names)
//!     → dispatcher.rs (freeze table behind Arc, derive UrlResolver)
//!
//! Incoming Request (method, normalized path)
//!     → dispatcher.rs
//!     → router.rs (first route with matching pattern AND method)
//!     → handler(request, PathParams) | not-found handler
//!
//! Handler / view
//!     → reverse.rs (route name + params → path, "" on failure)
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - First match wins, in registration order
//! - No global router: the table and its resolver are explicit values

pub mod dispatcher;
pub mod errors;
pub mod handler;
pub mod matcher;
pub mod params;
pub mod reverse;
pub mod router;

pub use dispatcher::Dispatcher;
pub use errors::{PatternError, ResolveError, RouteError};
pub use handler::{BoxHandler, Endpoint, Handler};
pub use matcher::PathPattern;
pub use params::PathParams;
pub use reverse::UrlResolver;
pub use router::{Route, RouteTable};
