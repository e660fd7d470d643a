//! Database operations for enforcement files.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::executions::model::{Execution, ExecutionListQuery, ExecutionUpdate};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

/// OFFSET for a 1-based page number. Saturates instead of overflowing,
/// so an absurd page number yields an empty result set, not an error.
fn page_offset(page: Option<i64>, limit: i64) -> i64 {
    page.unwrap_or(1).max(1).saturating_sub(1).saturating_mul(limit)
}

pub async fn fetch_live(pool: &PgPool, id: Uuid) -> Result<Option<Execution>, sqlx::Error> {
    sqlx::query_as::<_, Execution>(
        "SELECT * FROM executions WHERE id = $1 AND is_deleted = FALSE",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Every live execution, unpaginated. Used by the backup export.
pub async fn list_all_live(pool: &PgPool) -> Result<Vec<Execution>, sqlx::Error> {
    sqlx::query_as::<_, Execution>(
        "SELECT * FROM executions WHERE is_deleted = FALSE ORDER BY updated_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_live(
    pool: &PgPool,
    query: &ExecutionListQuery,
) -> Result<Vec<Execution>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM executions WHERE is_deleted = FALSE");

    if let Some(status) = &query.status {
        builder.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(client_id) = query.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    builder
        .push(" ORDER BY updated_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(page_offset(query.page, limit));

    builder.build_query_as::<Execution>().fetch_all(pool).await
}

pub async fn insert(pool: &PgPool, record: &Execution) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO executions
            (id, client_id, client_name, defendant, execution_office,
             execution_number, status, execution_type, start_date,
             office_archive_no, reminder_date, reminder_text, notes,
             haciz_durumu, responsible_person, gorevlendiren, version,
             is_deleted, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20)
        "#,
    )
    .bind(record.id)
    .bind(record.client_id)
    .bind(&record.client_name)
    .bind(&record.defendant)
    .bind(&record.execution_office)
    .bind(&record.execution_number)
    .bind(&record.status)
    .bind(&record.execution_type)
    .bind(record.start_date)
    .bind(&record.office_archive_no)
    .bind(record.reminder_date)
    .bind(&record.reminder_text)
    .bind(&record.notes)
    .bind(&record.haciz_durumu)
    .bind(&record.responsible_person)
    .bind(&record.gorevlendiren)
    .bind(record.version)
    .bind(record.is_deleted)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Compare-and-swap update; see `clients::db::update` for the protocol.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    expected_version: Option<i32>,
    patch: &ExecutionUpdate,
    client_name: Option<String>,
) -> Result<Option<Execution>, sqlx::Error> {
    sqlx::query_as::<_, Execution>(
        r#"
        UPDATE executions SET
            client_id = COALESCE($3::UUID, client_id),
            client_name = COALESCE($4::TEXT, client_name),
            defendant = COALESCE($5::TEXT, defendant),
            execution_office = COALESCE($6::TEXT, execution_office),
            execution_number = COALESCE($7::TEXT, execution_number),
            status = COALESCE($8::TEXT, status),
            execution_type = COALESCE($9::TEXT, execution_type),
            start_date = COALESCE($10::DATE, start_date),
            office_archive_no = COALESCE($11::TEXT, office_archive_no),
            reminder_date = COALESCE($12::DATE, reminder_date),
            reminder_text = COALESCE($13::TEXT, reminder_text),
            notes = COALESCE($14::TEXT, notes),
            haciz_durumu = COALESCE($15::TEXT, haciz_durumu),
            responsible_person = COALESCE($16::TEXT, responsible_person),
            gorevlendiren = COALESCE($17::TEXT, gorevlendiren),
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1 AND is_deleted = FALSE
          AND ($2::INTEGER IS NULL OR version = $2)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(expected_version)
    .bind(patch.client_id)
    .bind(client_name)
    .bind(&patch.defendant)
    .bind(&patch.execution_office)
    .bind(&patch.execution_number)
    .bind(&patch.status)
    .bind(&patch.execution_type)
    .bind(patch.start_date)
    .bind(&patch.office_archive_no)
    .bind(patch.reminder_date)
    .bind(&patch.reminder_text)
    .bind(&patch.notes)
    .bind(&patch.haciz_durumu)
    .bind(&patch.responsible_person)
    .bind(&patch.gorevlendiren)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE executions SET
            is_deleted = TRUE,
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1 AND is_deleted = FALSE
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_deleted<'e>(executor: impl PgExecutor<'e>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE executions SET is_deleted = TRUE, updated_at = NOW() WHERE is_deleted = FALSE",
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_snapshot<'e>(
    executor: impl PgExecutor<'e>,
    record: &Execution,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO executions
            (id, client_id, client_name, defendant, execution_office,
             execution_number, status, execution_type, start_date,
             office_archive_no, reminder_date, reminder_text, notes,
             haciz_durumu, responsible_person, gorevlendiren, version,
             is_deleted, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20)
        ON CONFLICT (id) DO UPDATE SET
            client_id = EXCLUDED.client_id,
            client_name = EXCLUDED.client_name,
            defendant = EXCLUDED.defendant,
            execution_office = EXCLUDED.execution_office,
            execution_number = EXCLUDED.execution_number,
            status = EXCLUDED.status,
            execution_type = EXCLUDED.execution_type,
            start_date = EXCLUDED.start_date,
            office_archive_no = EXCLUDED.office_archive_no,
            reminder_date = EXCLUDED.reminder_date,
            reminder_text = EXCLUDED.reminder_text,
            notes = EXCLUDED.notes,
            haciz_durumu = EXCLUDED.haciz_durumu,
            responsible_person = EXCLUDED.responsible_person,
            gorevlendiren = EXCLUDED.gorevlendiren,
            version = EXCLUDED.version,
            is_deleted = EXCLUDED.is_deleted,
            created_at = EXCLUDED.created_at,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(record.id)
    .bind(record.client_id)
    .bind(&record.client_name)
    .bind(&record.defendant)
    .bind(&record.execution_office)
    .bind(&record.execution_number)
    .bind(&record.status)
    .bind(&record.execution_type)
    .bind(record.start_date)
    .bind(&record.office_archive_no)
    .bind(record.reminder_date)
    .bind(&record.reminder_text)
    .bind(&record.notes)
    .bind(&record.haciz_durumu)
    .bind(&record.responsible_person)
    .bind(&record.gorevlendiren)
    .bind(record.version)
    .bind(record.is_deleted)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}
