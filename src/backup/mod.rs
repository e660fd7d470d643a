//! Backup export and bulk restore.
//!
//! # Module Structure
//!
//! ```text
//! backup/
//! └── handlers.rs    GET /api/backup, POST /api/restore
//! ```

pub mod handlers;

pub use handlers::{export_backup, restore_backup, BackupData, RestoreRequest, RestoreResponse};
