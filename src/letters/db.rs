//! Database operations for compensation letters.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::letters::model::{
    CompensationLetter, CompensationLetterListQuery, CompensationLetterUpdate,
};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

/// OFFSET for a 1-based page number. Saturates instead of overflowing,
/// so an absurd page number yields an empty result set, not an error.
fn page_offset(page: Option<i64>, limit: i64) -> i64 {
    page.unwrap_or(1).max(1).saturating_sub(1).saturating_mul(limit)
}

pub async fn fetch_live(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<CompensationLetter>, sqlx::Error> {
    sqlx::query_as::<_, CompensationLetter>(
        "SELECT * FROM compensation_letters WHERE id = $1 AND is_deleted = FALSE",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Every live letter, unpaginated. Used by the backup export.
pub async fn list_all_live(pool: &PgPool) -> Result<Vec<CompensationLetter>, sqlx::Error> {
    sqlx::query_as::<_, CompensationLetter>(
        "SELECT * FROM compensation_letters WHERE is_deleted = FALSE ORDER BY updated_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_live(
    pool: &PgPool,
    query: &CompensationLetterListQuery,
) -> Result<Vec<CompensationLetter>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM compensation_letters WHERE is_deleted = FALSE");

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

    builder
        .build_query_as::<CompensationLetter>()
        .fetch_all(pool)
        .await
}

pub async fn insert(pool: &PgPool, record: &CompensationLetter) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO compensation_letters
            (id, client_id, client_name, letter_number, bank,
             customer_number, customer, court, case_number, status,
             description_text, reminder_date, reminder_text,
             responsible_person, gorevlendiren, version, is_deleted,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19)
        "#,
    )
    .bind(record.id)
    .bind(record.client_id)
    .bind(&record.client_name)
    .bind(&record.letter_number)
    .bind(&record.bank)
    .bind(&record.customer_number)
    .bind(&record.customer)
    .bind(&record.court)
    .bind(&record.case_number)
    .bind(&record.status)
    .bind(&record.description_text)
    .bind(record.reminder_date)
    .bind(&record.reminder_text)
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
    patch: &CompensationLetterUpdate,
    client_name: Option<String>,
) -> Result<Option<CompensationLetter>, sqlx::Error> {
    sqlx::query_as::<_, CompensationLetter>(
        r#"
        UPDATE compensation_letters SET
            client_id = COALESCE($3::UUID, client_id),
            client_name = COALESCE($4::TEXT, client_name),
            letter_number = COALESCE($5::TEXT, letter_number),
            bank = COALESCE($6::TEXT, bank),
            customer_number = COALESCE($7::TEXT, customer_number),
            customer = COALESCE($8::TEXT, customer),
            court = COALESCE($9::TEXT, court),
            case_number = COALESCE($10::TEXT, case_number),
            status = COALESCE($11::TEXT, status),
            description_text = COALESCE($12::TEXT, description_text),
            reminder_date = COALESCE($13::DATE, reminder_date),
            reminder_text = COALESCE($14::TEXT, reminder_text),
            responsible_person = COALESCE($15::TEXT, responsible_person),
            gorevlendiren = COALESCE($16::TEXT, gorevlendiren),
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
    .bind(&patch.letter_number)
    .bind(&patch.bank)
    .bind(&patch.customer_number)
    .bind(&patch.customer)
    .bind(&patch.court)
    .bind(&patch.case_number)
    .bind(&patch.status)
    .bind(&patch.description_text)
    .bind(patch.reminder_date)
    .bind(&patch.reminder_text)
    .bind(&patch.responsible_person)
    .bind(&patch.gorevlendiren)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE compensation_letters SET
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
        "UPDATE compensation_letters SET is_deleted = TRUE, updated_at = NOW() WHERE is_deleted = FALSE",
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_snapshot<'e>(
    executor: impl PgExecutor<'e>,
    record: &CompensationLetter,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO compensation_letters
            (id, client_id, client_name, letter_number, bank,
             customer_number, customer, court, case_number, status,
             description_text, reminder_date, reminder_text,
             responsible_person, gorevlendiren, version, is_deleted,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19)
        ON CONFLICT (id) DO UPDATE SET
            client_id = EXCLUDED.client_id,
            client_name = EXCLUDED.client_name,
            letter_number = EXCLUDED.letter_number,
            bank = EXCLUDED.bank,
            customer_number = EXCLUDED.customer_number,
            customer = EXCLUDED.customer,
            court = EXCLUDED.court,
            case_number = EXCLUDED.case_number,
            status = EXCLUDED.status,
            description_text = EXCLUDED.description_text,
            reminder_date = EXCLUDED.reminder_date,
            reminder_text = EXCLUDED.reminder_text,
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
    .bind(&record.letter_number)
    .bind(&record.bank)
    .bind(&record.customer_number)
    .bind(&record.customer)
    .bind(&record.court)
    .bind(&record.case_number)
    .bind(&record.status)
    .bind(&record.description_text)
    .bind(record.reminder_date)
    .bind(&record.reminder_text)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_never_overflows() {
        assert_eq!(page_offset(None, DEFAULT_PAGE_SIZE), 0);
        assert_eq!(page_offset(Some(3), 50), 100);
        assert_eq!(page_offset(Some(i64::MAX), MAX_PAGE_SIZE), i64::MAX);
    }
}
