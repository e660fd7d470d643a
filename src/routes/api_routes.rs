/**
 * API Route Configuration
 *
 * All `/api` endpoints. Everything here except `POST /api/login` sits
 * behind the authentication middleware, so the functions split the
 * surface into a public and a protected router and the assembly in
 * `router.rs` applies the middleware layer to the protected half.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/login` - Shared-password login, mints a session JWT (public)
 * - `POST /api/auth/change-password` - Rotate the shared password
 *
 * ## Records (same shape for all four kinds)
 * - `GET    /api/<kind>` - List live records (filters/pagination where supported)
 * - `POST   /api/<kind>` - Create
 * - `GET    /api/<kind>/{id}` - Fetch one
 * - `PUT    /api/<kind>/{id}` - Version-checked patch
 * - `DELETE /api/<kind>/{id}` - Soft delete
 *
 * ## Aggregation & Administration
 * - `GET  /api/cases/search` - Structured case search
 * - `GET  /api/dashboard` - Counts and upcoming reminders
 * - `GET  /api/backup` - Export all live records
 * - `POST /api/restore` - Replace the live set from a snapshot
 */

use axum::routing::{get, post};
use axum::Router;

use crate::auth::{change_password, login};
use crate::backup::{export_backup, restore_backup};
use crate::cases::handlers as case_handlers;
use crate::clients::handlers as client_handlers;
use crate::dashboard::get_dashboard;
use crate::executions::handlers as execution_handlers;
use crate::letters::handlers as letter_handlers;
use crate::server::state::AppState;

/// Routes reachable without a session token.
pub fn public_api_routes() -> Router<AppState> {
    Router::new().route("/api/login", post(login))
}

/// Routes requiring an authenticated session.
///
/// `/api/cases/search` is registered before `/api/cases/{id}` so the
/// literal segment wins over the parameter.
pub fn protected_api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/change-password", post(change_password))
        // Clients
        .route(
            "/api/clients",
            get(client_handlers::list_clients).post(client_handlers::create_client),
        )
        .route(
            "/api/clients/{id}",
            get(client_handlers::get_client)
                .put(client_handlers::update_client)
                .delete(client_handlers::delete_client),
        )
        // Cases
        .route(
            "/api/cases",
            get(case_handlers::list_cases).post(case_handlers::create_case),
        )
        .route("/api/cases/search", get(case_handlers::search_cases))
        .route(
            "/api/cases/{id}",
            get(case_handlers::get_case)
                .put(case_handlers::update_case)
                .delete(case_handlers::delete_case),
        )
        // Executions
        .route(
            "/api/executions",
            get(execution_handlers::list_executions).post(execution_handlers::create_execution),
        )
        .route(
            "/api/executions/{id}",
            get(execution_handlers::get_execution)
                .put(execution_handlers::update_execution)
                .delete(execution_handlers::delete_execution),
        )
        // Compensation letters
        .route(
            "/api/compensation-letters",
            get(letter_handlers::list_letters).post(letter_handlers::create_letter),
        )
        .route(
            "/api/compensation-letters/{id}",
            get(letter_handlers::get_letter)
                .put(letter_handlers::update_letter)
                .delete(letter_handlers::delete_letter),
        )
        // Aggregation and administration
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/backup", get(export_backup))
        .route("/api/restore", post(restore_backup))
}
