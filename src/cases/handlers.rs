/**
 * Case CRUD Handlers
 *
 * Creating or reassigning a case validates the referenced client against
 * the live set and snapshots its name into the case. The two reads
 * (validate + copy name) are one query; a concurrent client deletion
 * between validation and commit remains a narrow accepted race at this
 * load profile.
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::handlers::MessageResponse;
use crate::cases::db;
use crate::cases::model::{Case, CaseCreate, CaseListQuery, CaseSearchQuery, CaseUpdate};
use crate::clients::db as clients_db;
use crate::error::AppError;
use crate::realtime::{ChangeEvent, EntityType};
use crate::server::state::AppState;

/// Resolve a referenced client to its live record's name.
async fn resolve_client_name(pool: &PgPool, client_id: Uuid) -> Result<String, AppError> {
    clients_db::fetch_live(pool, client_id)
        .await?
        .map(|client| client.name)
        .ok_or_else(|| AppError::reference("Client"))
}

/// GET /api/cases
pub async fn list_cases(
    State(pool): State<Option<PgPool>>,
    Query(query): Query<CaseListQuery>,
) -> Result<Json<Vec<Case>>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    Ok(Json(db::list_live(&pool, &query).await?))
}

/// GET /api/cases/search
pub async fn search_cases(
    State(pool): State<Option<PgPool>>,
    Query(query): Query<CaseSearchQuery>,
) -> Result<Json<Vec<Case>>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    Ok(Json(db::search(&pool, &query).await?))
}

/// GET /api/cases/{id}
pub async fn get_case(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Case>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;
    let record = db::fetch_live(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Case"))?;
    Ok(Json(record))
}

/// POST /api/cases
pub async fn create_case(
    State(state): State<AppState>,
    Json(payload): Json<CaseCreate>,
) -> Result<Json<Case>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;
    payload.validate()?;

    // Reference must resolve to a live client before anything is written.
    let client_name = resolve_client_name(&pool, payload.client_id).await?;

    let record = payload.into_record(client_name);
    db::insert(&pool, &record).await?;
    tracing::info!("Created case {}", record.id);

    state.registry.publish(&ChangeEvent::created(
        EntityType::Case,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// PUT /api/cases/{id}
pub async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CaseUpdate>,
) -> Result<Json<Case>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;
    payload.validate()?;

    // Changing the reference refreshes the denormalized name snapshot.
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
                    "Case",
                    expected.unwrap_or(current.version),
                    current.version,
                ))
            }
            None => return Err(AppError::not_found("Case")),
        },
    };

    tracing::info!("Updated case {} to version {}", record.id, record.version);
    state.registry.publish(&ChangeEvent::updated(
        EntityType::Case,
        record.id,
        serde_json::to_value(&record)?,
    ));

    Ok(Json(record))
}

/// DELETE /api/cases/{id}
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;

    if !db::soft_delete(&pool, id).await? {
        return Err(AppError::not_found("Case"));
    }

    tracing::info!("Soft-deleted case {}", id);
    state
        .registry
        .publish(&ChangeEvent::deleted(EntityType::Case, id));

    Ok(Json(MessageResponse {
        message: "Case deleted".to_string(),
    }))
}
