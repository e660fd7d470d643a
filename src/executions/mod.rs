//! Enforcement (Execution) File Records

/// Record, create, patch and query types
pub mod model;

/// Store queries
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use model::{Execution, ExecutionCreate, ExecutionListQuery, ExecutionUpdate};
