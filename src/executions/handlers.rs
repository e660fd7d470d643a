//! Enforcement file CRUD handlers. Same optimistic-concurrency protocol
//! as the client handlers; the referenced client must be live at creation
//! and reassignment time.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::handlers::MessageResponse;
use crate::clients::db as clients_db;
use crate::error::AppError;
use crate::executions::db;
use crate::executions::model::{Execution, ExecutionCreate, ExecutionListQuery, ExecutionUpdate};
use crate::realtime::{ChangeEvent, EntityType};
use crate::server::state::AppState;

async fn resolve_client_name(pool: &PgPool, client_id: Uuid) -> Result<String, AppError> {
    clients_db::fetch_live(pool, client_id)
        .await?
        .map(|client| client.name)
        .ok_or_else(|| AppError::reference("Client"))
}

/// GET /api/executions
pub async fn list_executions(
    State(pool): State<Option<PgPool>>,
    Query(query): Query<ExecutionListQuery>,
) -> Result<Json<Vec<Execution>>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    Ok(Json(db::list_live(&pool, &query).await?))
}

/// GET /api/executions/{id}
pub async fn get_execution(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Execution>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    let record = db::fetch_live(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Execution"))?;
    Ok(Json(record))
}

/// POST /api/executions
pub async fn create_execution(
    State(state): State<AppState>,
    Json(payload): Json<ExecutionCreate>,
) -> Result<Json<Execution>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;
    payload.validate()?;

    let client_name = resolve_client_name(&pool, payload.client_id).await?;
    let record = payload.into_record(client_name);
    db::insert(&pool, &record).await?;
    tracing::info!("Created execution {}", record.id);

    state.registry.publish(&ChangeEvent::created(
        EntityType::Execution,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// PUT /api/executions/{id}
pub async fn update_execution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExecutionUpdate>,
) -> Result<Json<Execution>, AppError> {
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
                    "Execution",
                    expected.unwrap_or(current.version),
                    current.version,
                ))
            }
            None => return Err(AppError::not_found("Execution")),
        },
    };

    tracing::info!("Updated execution {} to version {}", record.id, record.version);
    state.registry.publish(&ChangeEvent::updated(
        EntityType::Execution,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// DELETE /api/executions/{id}
pub async fn delete_execution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;

    if !db::soft_delete(&pool, id).await? {
        return Err(AppError::not_found("Execution"));
    }

    tracing::info!("Soft-deleted execution {}", id);
    state
        .registry
        .publish(&ChangeEvent::deleted(EntityType::Execution, id));

    Ok(Json(MessageResponse {
        message: "Execution deleted".to_string(),
    }))
}
