//! Client Records
//!
//! CRUD for the client record kind - the root every case, execution, and
//! compensation letter references.
//!
//! ```text
//! clients/
//! ├── mod.rs      - Module exports
//! ├── model.rs    - Record, create and patch types
//! ├── db.rs       - Store queries (CAS update, soft delete, snapshots)
//! └── handlers.rs - HTTP handlers
//! ```

/// Record, create and patch types
pub mod model;

/// Store queries
pub mod db;

/// HTTP handlers
pub mod handlers;

pub use model::{Client, ClientCreate, ClientUpdate};
