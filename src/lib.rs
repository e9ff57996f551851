//! JSON REST API backend for the full-stack starter template.
//!
//! Serves a health check and a small user-management API under `/api`,
//! backed by an in-memory user list that lives for the process lifetime.
//!
//! ```text
//! GET  /api/health      -> server status
//! GET  /api/users       -> all users
//! POST /api/users       -> create {name, email}
//! GET  /api/users/{id}  -> one user
//! ```
//!
//! Every response is wrapped in the same envelope:
//! `{"success": bool, "message": string, "data"?: any}`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`models`]: Users and the response envelope
//! - [`store`]: Shared in-memory user store
//! - [`api`]: HTTP routes, handlers and middleware
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, StartupError};
pub use store::UserStore;
