//! Middleware Module
//!
//! Request-processing middleware. Currently only JWT authentication for
//! the protected `/api` routes.

/// JWT authentication middleware
pub mod auth;

pub use auth::{auth_middleware, AuthSession};
