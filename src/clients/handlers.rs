/**
 * Client CRUD Handlers
 *
 * Every mutation follows the optimistic-concurrency protocol: validate,
 * commit through a version-checked statement, then hand the committed
 * snapshot to the broadcaster. A notification failure never rolls back or
 * fails the mutation - the write has already committed.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::handlers::MessageResponse;
use crate::clients::db;
use crate::clients::model::{Client, ClientCreate, ClientUpdate};
use crate::error::AppError;
use crate::realtime::{ChangeEvent, EntityType};
use crate::server::state::AppState;

/// GET /api/clients
pub async fn list_clients(
    State(pool): State<Option<PgPool>>,
) -> Result<Json<Vec<Client>>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    Ok(Json(db::list_live(&pool).await?))
}

/// GET /api/clients/{id}
pub async fn get_client(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    let record = db::fetch_live(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Client"))?;
    Ok(Json(record))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<ClientCreate>,
) -> Result<Json<Client>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;
    payload.validate()?;

    let record = payload.into_record();
    db::insert(&pool, &record).await?;
    tracing::info!("Created client {}", record.id);

    state.registry.publish(&ChangeEvent::created(
        EntityType::Client,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// PUT /api/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientUpdate>,
) -> Result<Json<Client>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;
    payload.validate()?;

    let expected = payload.version;
    let updated = db::update(&pool, id, expected, &payload).await?;

    let record = match updated {
        Some(record) => record,
        // Zero rows: tell a missing record apart from a lost version race.
        None => match db::fetch_live(&pool, id).await? {
            Some(current) => {
                return Err(AppError::conflict(
                    "Client",
                    expected.unwrap_or(current.version),
                    current.version,
                ))
            }
            None => return Err(AppError::not_found("Client")),
        },
    };

    tracing::info!("Updated client {} to version {}", record.id, record.version);
    state.registry.publish(&ChangeEvent::updated(
        EntityType::Client,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;

    if !db::soft_delete(&pool, id).await? {
        return Err(AppError::not_found("Client"));
    }

    tracing::info!("Soft-deleted client {}", id);
    state
        .registry
        .publish(&ChangeEvent::deleted(EntityType::Client, id));

    Ok(Json(MessageResponse {
        message: "Client deleted".to_string(),
    }))
}
