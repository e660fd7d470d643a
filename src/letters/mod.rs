//! Compensation Letter Records

/// Record, create, patch and query types
pub mod model;

/// Store queries
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use model::{
    CompensationLetter, CompensationLetterCreate, CompensationLetterListQuery,
    CompensationLetterUpdate,
};
