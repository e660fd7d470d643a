/**
 * Router Assembly
 *
 * Combines the public routes, the authenticated API surface, and the
 * WebSocket subscription endpoint into one router, then layers CORS
 * and request tracing over the whole thing.
 *
 * # Route Order
 *
 * 1. WebSocket subscription (`/ws/{token}` - token verified in-handler)
 * 2. Public API routes (`POST /api/login`)
 * 3. Protected API routes (everything else, behind the auth middleware)
 * 4. Health check and 404 fallback
 */

use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::auth_middleware;
use crate::realtime::handle_ws_subscription;
use crate::routes::api_routes::{protected_api_routes, public_api_routes};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured.
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = protected_api_routes().route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/ws/{token}", get(handle_ws_subscription))
        .merge(public_api_routes())
        .merge(protected)
        .route("/health", get(health))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        // Browser clients connect from arbitrary origins; auth is the
        // bearer token, not cookies, so a permissive policy is fine.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}
