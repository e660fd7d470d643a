//! Compensation letter CRUD handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::handlers::MessageResponse;
use crate::clients::db as clients_db;
use crate::error::AppError;
use crate::letters::db;
use crate::letters::model::{
    CompensationLetter, CompensationLetterCreate, CompensationLetterListQuery,
    CompensationLetterUpdate,
};
use crate::realtime::{ChangeEvent, EntityType};
use crate::server::state::AppState;

async fn resolve_client_name(pool: &PgPool, client_id: Uuid) -> Result<String, AppError> {
    clients_db::fetch_live(pool, client_id)
        .await?
        .map(|client| client.name)
        .ok_or_else(|| AppError::reference("Client"))
}

/// GET /api/compensation-letters
pub async fn list_letters(
    State(pool): State<Option<PgPool>>,
    Query(query): Query<CompensationLetterListQuery>,
) -> Result<Json<Vec<CompensationLetter>>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    Ok(Json(db::list_live(&pool, &query).await?))
}

/// GET /api/compensation-letters/{id}
pub async fn get_letter(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompensationLetter>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    let record = db::fetch_live(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("CompensationLetter"))?;
    Ok(Json(record))
}

/// POST /api/compensation-letters
pub async fn create_letter(
    State(state): State<AppState>,
    Json(payload): Json<CompensationLetterCreate>,
) -> Result<Json<CompensationLetter>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;
    payload.validate()?;

    let client_name = resolve_client_name(&pool, payload.client_id).await?;
    let record = payload.into_record(client_name);
    db::insert(&pool, &record).await?;
    tracing::info!("Created compensation letter {}", record.id);

    state.registry.publish(&ChangeEvent::created(
        EntityType::CompensationLetter,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// PUT /api/compensation-letters/{id}
pub async fn update_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompensationLetterUpdate>,
) -> Result<Json<CompensationLetter>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;

    let client_name = match payload.client_id {
        Some(client_id) => Some(resolve_client_name(&pool, client_id).await?),
        None => None,
    };

    let expected = payload.version;
    let record = match db::update(&pool, id, expected, &payload, client_name).await? {
        Some(record) => record,
        None => match db::fetch_live(&pool, id).await? {
            Some(current) => {
                return Err(AppError::conflict(
                    "CompensationLetter",
                    expected.unwrap_or(current.version),
                    current.version,
                ))
            }
            None => return Err(AppError::not_found("CompensationLetter")),
        },
    };

    tracing::info!(
        "Updated compensation letter {} to version {}",
        record.id,
        record.version
    );
    state.registry.publish(&ChangeEvent::updated(
        EntityType::CompensationLetter,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// DELETE /api/compensation-letters/{id}
pub async fn delete_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;

    if !db::soft_delete(&pool, id).await? {
        return Err(AppError::not_found("CompensationLetter"));
    }

    tracing::info!("Soft-deleted compensation letter {}", id);
    state
        .registry
        .publish(&ChangeEvent::deleted(EntityType::CompensationLetter, id));

    Ok(Json(MessageResponse {
        message: "Compensation letter deleted".to_string(),
    }))
}
