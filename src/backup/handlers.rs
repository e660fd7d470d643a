/**
 * Backup Export & Bulk Restore
 *
 * Export returns a snapshot of every live record, one sub-collection per
 * record kind. Restore is the administrative inverse: inside one
 * transaction it marks every live record of all four kinds as deleted,
 * then re-creates records from the snapshot, preserving their ids,
 * versions and timestamps (parsed back from their RFC 3339 form by
 * serde). A malformed individual record is logged and skipped - it never
 * aborts the rest of the restore. After the single commit, one "restore"
 * event covering all entity kinds is broadcast.
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::cases::{db as cases_db, Case};
use crate::clients::{db as clients_db, Client};
use crate::error::AppError;
use crate::executions::{db as executions_db, Execution};
use crate::letters::{db as letters_db, CompensationLetter};
use crate::realtime::ChangeEvent;
use crate::server::state::AppState;

/// Full backup snapshot: one sub-collection per record kind.
#[derive(Debug, Serialize)]
pub struct BackupData {
    pub clients: Vec<Client>,
    pub cases: Vec<Case>,
    pub executions: Vec<Execution>,
    pub compensation_letters: Vec<CompensationLetter>,
}

/// Incoming snapshot for restore. Records stay as raw JSON so one
/// malformed entry can be skipped without rejecting the whole payload.
#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    #[serde(default)]
    pub clients: Vec<serde_json::Value>,
    #[serde(default)]
    pub cases: Vec<serde_json::Value>,
    #[serde(default)]
    pub executions: Vec<serde_json::Value>,
    #[serde(default)]
    pub compensation_letters: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub message: String,
    pub restored: usize,
    pub skipped: usize,
}

/// GET /api/backup
pub async fn export_backup(
    State(pool): State<Option<PgPool>>,
) -> Result<Json<BackupData>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;

    let backup = BackupData {
        clients: clients_db::list_live(&pool).await?,
        cases: cases_db::list_all_live(&pool).await?,
        executions: executions_db::list_all_live(&pool).await?,
        compensation_letters: letters_db::list_all_live(&pool).await?,
    };

    tracing::info!(
        "Exported backup: {} clients, {} cases, {} executions, {} letters",
        backup.clients.len(),
        backup.cases.len(),
        backup.executions.len(),
        backup.compensation_letters.len()
    );
    Ok(Json(backup))
}

/// POST /api/restore
pub async fn restore_backup(
    State(state): State<AppState>,
    Json(snapshot): Json<RestoreRequest>,
) -> Result<Json<RestoreResponse>, AppError> {
    let pool = state.db_pool.clone().ok_or(AppError::ServiceUnavailable)?;

    let mut tx = pool.begin().await?;

    // Everything currently live goes away; only snapshot records survive.
    clients_db::mark_all_deleted(&mut *tx).await?;
    cases_db::mark_all_deleted(&mut *tx).await?;
    executions_db::mark_all_deleted(&mut *tx).await?;
    letters_db::mark_all_deleted(&mut *tx).await?;

    let mut restored = 0usize;
    let mut skipped = 0usize;

    // Clients first so restored rows satisfy the foreign keys.
    for value in snapshot.clients {
        match serde_json::from_value::<Client>(value) {
            Ok(record) => match clients_db::insert_snapshot(&mut *tx, &record).await {
                Ok(()) => restored += 1,
                Err(e) => {
                    tracing::warn!("Skipping client row in restore: {:?}", e);
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Skipping malformed client row in restore: {}", e);
                skipped += 1;
            }
        }
    }

    for value in snapshot.cases {
        match serde_json::from_value::<Case>(value) {
            Ok(record) => match cases_db::insert_snapshot(&mut *tx, &record).await {
                Ok(()) => restored += 1,
                Err(e) => {
                    tracing::warn!("Skipping case row in restore: {:?}", e);
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Skipping malformed case row in restore: {}", e);
                skipped += 1;
            }
        }
    }

    for value in snapshot.executions {
        match serde_json::from_value::<Execution>(value) {
            Ok(record) => match executions_db::insert_snapshot(&mut *tx, &record).await {
                Ok(()) => restored += 1,
                Err(e) => {
                    tracing::warn!("Skipping execution row in restore: {:?}", e);
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Skipping malformed execution row in restore: {}", e);
                skipped += 1;
            }
        }
    }

    for value in snapshot.compensation_letters {
        match serde_json::from_value::<CompensationLetter>(value) {
            Ok(record) => match letters_db::insert_snapshot(&mut *tx, &record).await {
                Ok(()) => restored += 1,
                Err(e) => {
                    tracing::warn!("Skipping compensation letter row in restore: {:?}", e);
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!("Skipping malformed compensation letter row in restore: {}", e);
                skipped += 1;
            }
        }
    }

    tx.commit().await?;
    tracing::info!("Restore committed: {} restored, {} skipped", restored, skipped);

    // One event for the whole restore; viewers re-fetch everything.
    state.registry.publish(&ChangeEvent::restored());

    Ok(Json(RestoreResponse {
        message: "Restore completed".to_string(),
        restored,
        skipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_request_missing_collections_default_empty() {
        let request: RestoreRequest = serde_json::from_str(r#"{"clients":[]}"#).unwrap();
        assert!(request.clients.is_empty());
        assert!(request.cases.is_empty());
        assert!(request.executions.is_empty());
        assert!(request.compensation_letters.is_empty());
    }

    #[test]
    fn test_snapshot_timestamps_parse_back_from_text() {
        let value = serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "name": "Ada",
            "email": "",
            "phone": "",
            "address": "",
            "tax_id": null,
            "vekalet_ofis_no": null,
            "version": 3,
            "is_deleted": false,
            "created_at": "2026-01-02T03:04:05Z",
            "updated_at": "2026-02-03T04:05:06Z",
        });
        let record: Client = serde_json::from_value(value).unwrap();
        assert_eq!(record.version, 3);
        assert_eq!(record.created_at.to_rfc3339(), "2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_malformed_record_is_detectable_without_failing_parse() {
        // The collection parses even when one entry is junk; the handler
        // skips that entry at restore time.
        let request: RestoreRequest = serde_json::from_value(serde_json::json!({
            "clients": [{"not": "a client"}],
        }))
        .unwrap();
        assert_eq!(request.clients.len(), 1);
        assert!(serde_json::from_value::<Client>(request.clients[0].clone()).is_err());
    }
}
