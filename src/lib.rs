//! manifest-deploy: status service and deployment readiness validator.
//!
//! The `validate` module checks that a project directory is ready to be
//! deployed by its GitHub Actions workflow. The `routes` and `http` modules
//! implement the small JSON status service the project deploys.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validate;

pub use error::*;
