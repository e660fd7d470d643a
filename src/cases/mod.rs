//! Case Records
//!
//! CRUD, filtered listing and structured search for court cases.

/// Record, create, patch and query types
pub mod model;

/// Store queries
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use model::{Case, CaseCreate, CaseListQuery, CaseSearchQuery, CaseUpdate};
