//! Dashboard aggregation: live counts and upcoming reminders.

pub mod handlers;

pub use handlers::{get_dashboard, DashboardData, Reminder};
