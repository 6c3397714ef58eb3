//! Sample users REST API.
//!
//! A small JSON service used as a CI/CD pipeline fixture: a welcome message,
//! a health check, and a read-only user directory that also accepts (but
//! never stores) new users.
//!
//! ```text
//! GET  /               welcome message
//! GET  /health         liveness and uptime
//! GET  /api/users      the three seed users
//! GET  /api/users/:id  one seed user, or 404
//! POST /api/users      validate {name, email}, echo back with a new id
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`users`]: User model and seed data
//! - [`validation`]: Required-field schemas for request bodies
//! - [`api`]: HTTP router and handlers
//! - [`metrics`]: Request metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod users;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use error::{ApiError, AppError, Result};
