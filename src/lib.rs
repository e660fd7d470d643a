//! LexCloud - Legal Case Management Backend
//!
//! Backend for a small law office: clients, court cases, enforcement
//! (execution) files, and compensation letters, with shared-password
//! authentication, optimistic concurrency on every mutation, soft
//! deletes, best-effort WebSocket change notifications, and full
//! backup/restore.
//!
//! # Module Structure
//!
//! - **`server`** - App state, configuration, initialization
//! - **`routes`** - Router assembly and `/api` endpoint registration
//! - **`auth`** / **`middleware`** - Shared-password login, JWT sessions, route guard
//! - **`clients`** / **`cases`** / **`executions`** / **`letters`** - The four
//!   record kinds, each with model, store queries, and HTTP handlers
//! - **`dashboard`** - Counts and upcoming reminders
//! - **`backup`** - Snapshot export and transactional bulk restore
//! - **`realtime`** - Connection registry and WebSocket fan-out
//! - **`error`** - Application error type and HTTP mapping
//!
//! # Usage
//!
//! ```rust,no_run
//! use lexcloud::server::create_app;
//!
//! # async fn example() {
//! let app = create_app().await;
//! // Serve with axum
//! # }
//! ```

/// Application error type and HTTP mapping
pub mod error;

/// Shared-password authentication and JWT sessions
pub mod auth;

/// Request middleware (authentication guard)
pub mod middleware;

/// Client records
pub mod clients;

/// Court case records
pub mod cases;

/// Enforcement (execution) file records
pub mod executions;

/// Compensation letter records
pub mod letters;

/// Dashboard aggregation
pub mod dashboard;

/// Backup export and bulk restore
pub mod backup;

/// Real-time change notifications
pub mod realtime;

/// HTTP route configuration
pub mod routes;

/// Server bootstrap
pub mod server;
