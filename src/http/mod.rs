//! HTTP server module.
//!
//! Binds the status service on the configured address and serves it until
//! SIGTERM/SIGINT, draining in-flight requests before returning.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
