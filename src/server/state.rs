/**
 * Application State Management
 *
 * `AppState` is the central state container handed to the router. It
 * holds the optional database pool and the realtime connection
 * registry; both are cheap to clone (pool is an Arc internally, the
 * registry clones its Arc).
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only the part of
 * the state they use: read-only handlers take `State<Option<PgPool>>`,
 * mutation handlers take the whole `AppState` so they can publish
 * change events after committing.
 *
 * The registry is an explicit component of the state, not a global.
 * Tests build their own `AppState` around a fresh registry.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::realtime::ConnectionRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured; handlers answer 503.
    pub db_pool: Option<PgPool>,
    /// Realtime fan-out registry for change events.
    pub registry: ConnectionRegistry,
}

impl AppState {
    pub fn new(db_pool: Option<PgPool>) -> Self {
        Self {
            db_pool,
            registry: ConnectionRegistry::new(),
        }
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<AppState> for ConnectionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_without_database_extracts_none_pool() {
        let state = AppState::new(None);
        let pool: Option<PgPool> = Option::<PgPool>::from_ref(&state);
        assert!(pool.is_none());
    }

    #[test]
    fn test_cloned_state_shares_one_registry() {
        let state = AppState::new(None);
        let clone = state.clone();
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        state.registry.register("session", uuid::Uuid::new_v4(), tx);
        assert_eq!(clone.registry.channel_count(), 1);
    }
}
