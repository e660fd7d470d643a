//! Error Module
//!
//! Error taxonomy for the backend and its conversion to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - AppError definition and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Handlers return `Result<_, AppError>` and propagate with `?`; the
//! `IntoResponse` impl renders a `{"detail": ...}` JSON body with the
//! right status code.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::AppError;
