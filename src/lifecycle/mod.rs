//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Register routes → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error (bad config, duplicate route) is fatal
//! - The listener binds last, after the route table is frozen

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
