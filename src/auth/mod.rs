//! Authentication Module
//!
//! Single shared-password authentication. A successful login mints a JWT
//! whose `sub` claim is a fresh session id; that id doubles as the
//! subscriber identity for real-time notification routing.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports
//! ├── sessions.rs - JWT issuance and verification
//! ├── password.rs - Shared password hash storage (app_settings)
//! └── handlers.rs - Login and change-password endpoints
//! ```

/// JWT issuance and verification
pub mod sessions;

/// Shared password hash storage
pub mod password;

/// Login and change-password endpoints
pub mod handlers;

pub use handlers::{change_password, login};
pub use sessions::{create_session_token, verify_token, Claims};
