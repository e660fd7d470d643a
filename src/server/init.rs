/**
 * Server Initialization
 *
 * Builds the Axum application: loads the optional database, seeds the
 * shared password hash on first start, creates the shared state, and
 * hands everything to the router.
 */

use axum::Router;

use crate::auth::password::ensure_password_seeded;
use crate::routes::create_router;
use crate::server::config::load_database;
use crate::server::state::AppState;

/// Create and configure the Axum application.
///
/// Startup is resilient: a missing database or a failed password seed
/// is logged and the server comes up in degraded mode.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing case management backend");

    let db_pool = load_database().await;

    if let Some(pool) = &db_pool {
        if let Err(e) = ensure_password_seeded(pool).await {
            tracing::error!("Failed to seed application password: {:?}", e);
        }
    }

    let app_state = AppState::new(db_pool);

    create_router(app_state)
}
