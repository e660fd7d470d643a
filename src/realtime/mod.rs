//! Real-time Update Module
//!
//! Best-effort change-notification fan-out to connected viewers. Every
//! successful mutation publishes a [`ChangeEvent`] through the
//! [`ConnectionRegistry`]; each connected viewer holds one WebSocket
//! channel (several per viewer are fine, e.g. multiple browser tabs).
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports
//! ├── events.rs    - Change event envelope and wire format
//! ├── registry.rs  - Connection registry and broadcaster
//! └── websocket.rs - WebSocket subscription handler
//! ```
//!
//! # Guarantees
//!
//! - Delivery is best-effort: a failed send prunes that channel but never
//!   fails the mutation that triggered the event.
//! - Per-channel ordering follows publish order; there is no cross-channel
//!   ordering and no replay for channels that were down at publish time.

/// Change event envelope and wire format
pub mod events;

/// Connection registry and broadcaster
pub mod registry;

/// WebSocket subscription handler
pub mod websocket;

pub use events::{ChangeEvent, ChangeType, EntityType};
pub use registry::ConnectionRegistry;
pub use websocket::handle_ws_subscription;
