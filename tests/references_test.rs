//! Client-reference integrity integration tests
//!
//! Creating or reassigning a dependent record must resolve its client_id
//! against the live client set, fail with a reference error otherwise,
//! and write nothing on failure. These drive the real handlers, so they
//! need a Postgres instance via `TEST_DATABASE_URL`; without it every
//! test passes as a no-op.

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::response::Json;
use lexcloud::cases::handlers::{create_case, update_case};
use lexcloud::cases::{CaseCreate, CaseUpdate};
use lexcloud::clients::{db as clients_db, ClientCreate};
use lexcloud::error::AppError;
use lexcloud::executions::handlers::create_execution;
use lexcloud::executions::ExecutionCreate;
use lexcloud::letters::handlers::create_letter;
use lexcloud::letters::CompensationLetterCreate;
use lexcloud::server::AppState;
use sqlx::PgPool;
use uuid::Uuid;

async fn test_state() -> Option<AppState> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!().run(&pool).await.expect("run migrations");
    Some(AppState::new(Some(pool)))
}

fn pool(state: &AppState) -> &PgPool {
    state.db_pool.as_ref().unwrap()
}

async fn seed_client(state: &AppState, name: &str) -> lexcloud::clients::Client {
    let record = ClientCreate {
        name: name.to_string(),
        email: String::new(),
        phone: String::new(),
        address: String::new(),
        tax_id: None,
        vekalet_ofis_no: None,
    }
    .into_record();
    clients_db::insert(pool(state), &record).await.unwrap();
    record
}

async fn case_count_for_client(state: &AppState, client_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cases WHERE client_id = $1")
        .bind(client_id)
        .fetch_one(pool(state))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_case_create_against_deleted_client_writes_nothing() {
    let Some(state) = test_state().await else { return };

    let client = seed_client(&state, "ref-deleted-client").await;
    clients_db::soft_delete(pool(&state), client.id).await.unwrap();

    let payload: CaseCreate = serde_json::from_value(serde_json::json!({
        "client_id": client.id,
        "case_name": "orphan attempt",
    }))
    .unwrap();

    let result = create_case(State(state.clone()), Json(payload)).await;
    assert_matches!(result, Err(AppError::Reference { entity: "Client" }));
    assert_eq!(case_count_for_client(&state, client.id).await, 0);
}

#[tokio::test]
async fn test_case_create_against_unknown_client_fails() {
    let Some(state) = test_state().await else { return };

    let missing = Uuid::new_v4();
    let payload: CaseCreate = serde_json::from_value(serde_json::json!({
        "client_id": missing,
        "case_name": "no such client",
    }))
    .unwrap();

    let result = create_case(State(state.clone()), Json(payload)).await;
    assert_matches!(result, Err(AppError::Reference { entity: "Client" }));
    assert_eq!(case_count_for_client(&state, missing).await, 0);
}

#[tokio::test]
async fn test_case_reassignment_refreshes_client_name_snapshot() {
    let Some(state) = test_state().await else { return };

    let first = seed_client(&state, "ref-first-owner").await;
    let second = seed_client(&state, "ref-second-owner").await;

    let payload: CaseCreate = serde_json::from_value(serde_json::json!({
        "client_id": first.id,
        "case_name": "reassigned case",
    }))
    .unwrap();
    let Json(case) = create_case(State(state.clone()), Json(payload)).await.unwrap();
    assert_eq!(case.client_name, "ref-first-owner");

    let patch: CaseUpdate = serde_json::from_value(serde_json::json!({
        "client_id": second.id,
        "version": case.version,
    }))
    .unwrap();
    let Json(updated) = update_case(State(state.clone()), Path(case.id), Json(patch))
        .await
        .unwrap();

    assert_eq!(updated.client_id, second.id);
    assert_eq!(updated.client_name, "ref-second-owner");
    assert_eq!(updated.version, case.version + 1);
}

#[tokio::test]
async fn test_case_reassignment_to_deleted_client_is_rejected() {
    let Some(state) = test_state().await else { return };

    let owner = seed_client(&state, "ref-kept-owner").await;
    let doomed = seed_client(&state, "ref-doomed-owner").await;

    let payload: CaseCreate = serde_json::from_value(serde_json::json!({
        "client_id": owner.id,
        "case_name": "sticky case",
    }))
    .unwrap();
    let Json(case) = create_case(State(state.clone()), Json(payload)).await.unwrap();

    clients_db::soft_delete(pool(&state), doomed.id).await.unwrap();

    let patch: CaseUpdate = serde_json::from_value(serde_json::json!({
        "client_id": doomed.id,
        "version": case.version,
    }))
    .unwrap();
    let result = update_case(State(state.clone()), Path(case.id), Json(patch)).await;
    assert_matches!(result, Err(AppError::Reference { entity: "Client" }));

    // The rejected reassignment changed nothing.
    let current = lexcloud::cases::db::fetch_live(pool(&state), case.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.client_id, owner.id);
    assert_eq!(current.client_name, "ref-kept-owner");
    assert_eq!(current.version, case.version);
}

#[tokio::test]
async fn test_execution_create_against_deleted_client_writes_nothing() {
    let Some(state) = test_state().await else { return };

    let client = seed_client(&state, "ref-exec-client").await;
    clients_db::soft_delete(pool(&state), client.id).await.unwrap();

    let payload: ExecutionCreate =
        serde_json::from_value(serde_json::json!({"client_id": client.id})).unwrap();
    let result = create_execution(State(state.clone()), Json(payload)).await;
    assert_matches!(result, Err(AppError::Reference { entity: "Client" }));

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM executions WHERE client_id = $1",
    )
    .bind(client.id)
    .fetch_one(pool(&state))
    .await
    .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_letter_create_against_deleted_client_writes_nothing() {
    let Some(state) = test_state().await else { return };

    let client = seed_client(&state, "ref-letter-client").await;
    clients_db::soft_delete(pool(&state), client.id).await.unwrap();

    let payload: CompensationLetterCreate =
        serde_json::from_value(serde_json::json!({"client_id": client.id})).unwrap();
    let result = create_letter(State(state.clone()), Json(payload)).await;
    assert_matches!(result, Err(AppError::Reference { entity: "Client" }));

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM compensation_letters WHERE client_id = $1",
    )
    .bind(client.id)
    .fetch_one(pool(&state))
    .await
    .unwrap();
    assert_eq!(count, 0);
}
