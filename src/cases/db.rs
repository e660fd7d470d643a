//! Database operations for case records.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::cases::model::{Case, CaseListQuery, CaseSearchQuery, CaseUpdate};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

pub async fn fetch_live(pool: &PgPool, id: Uuid) -> Result<Option<Case>, sqlx::Error> {
    sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE id = $1 AND is_deleted = FALSE")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// OFFSET for a 1-based page number. Saturates instead of overflowing,
/// so an absurd page number yields an empty result set, not an error.
fn page_offset(page: Option<i64>, limit: i64) -> i64 {
    page.unwrap_or(1).max(1).saturating_sub(1).saturating_mul(limit)
}

/// Every live case, unpaginated. Used by the backup export.
pub async fn list_all_live(pool: &PgPool) -> Result<Vec<Case>, sqlx::Error> {
    sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE is_deleted = FALSE ORDER BY updated_at DESC")
        .fetch_all(pool)
        .await
}

/// List live cases with the caller's filters, most recently updated
/// first, paginated.
pub async fn list_live(pool: &PgPool, query: &CaseListQuery) -> Result<Vec<Case>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM cases WHERE is_deleted = FALSE");

    if let Some(status) = &query.status {
        builder.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(client_id) = query.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }
    if let Some(text) = query.query.as_ref().filter(|t| !t.trim().is_empty()) {
        let pattern = format!("%{}%", text.trim());
        builder
            .push(" AND (case_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR case_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR defendant ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR client_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(person) = &query.responsible_person {
        builder
            .push(" AND responsible_person = ")
            .push_bind(person.clone());
    }
    if let Some(assigner) = &query.gorevlendiren {
        builder
            .push(" AND gorevlendiren = ")
            .push_bind(assigner.clone());
    }

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    builder
        .push(" ORDER BY updated_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(page_offset(query.page, limit));

    builder.build_query_as::<Case>().fetch_all(pool).await
}

/// Structured search (GET /api/cases/search).
pub async fn search(pool: &PgPool, query: &CaseSearchQuery) -> Result<Vec<Case>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM cases WHERE is_deleted = FALSE");

    if let Some(case_type) = &query.case_type {
        builder.push(" AND case_type = ").push_bind(case_type.clone());
    }
    if let Some(status) = &query.status {
        builder.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(court) = &query.court {
        builder.push(" AND court = ").push_bind(court.clone());
    }
    if let Some(client_id) = query.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }
    if let Some(defendant) = query.q.as_ref().filter(|t| !t.trim().is_empty()) {
        builder
            .push(" AND defendant ILIKE ")
            .push_bind(format!("%{}%", defendant.trim()));
    }

    builder.push(" ORDER BY updated_at DESC");
    builder.build_query_as::<Case>().fetch_all(pool).await
}

pub async fn insert(pool: &PgPool, record: &Case) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cases
            (id, client_id, client_name, case_name, description, case_type,
             status, court, case_number, defendant, notes, start_date,
             next_hearing_date, reminder_date, office_archive_no,
             responsible_person, gorevlendiren, version, is_deleted,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21)
        "#,
    )
    .bind(record.id)
    .bind(record.client_id)
    .bind(&record.client_name)
    .bind(&record.case_name)
    .bind(&record.description)
    .bind(&record.case_type)
    .bind(&record.status)
    .bind(&record.court)
    .bind(&record.case_number)
    .bind(&record.defendant)
    .bind(&record.notes)
    .bind(record.start_date)
    .bind(record.next_hearing_date)
    .bind(record.reminder_date)
    .bind(&record.office_archive_no)
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
/// `client_name` is passed separately because it is derived from the
/// referenced client, not supplied by the caller.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    expected_version: Option<i32>,
    patch: &CaseUpdate,
    client_name: Option<String>,
) -> Result<Option<Case>, sqlx::Error> {
    sqlx::query_as::<_, Case>(
        r#"
        UPDATE cases SET
            client_id = COALESCE($3::UUID, client_id),
            client_name = COALESCE($4::TEXT, client_name),
            case_name = COALESCE($5::TEXT, case_name),
            description = COALESCE($6::TEXT, description),
            case_type = COALESCE($7::TEXT, case_type),
            status = COALESCE($8::TEXT, status),
            court = COALESCE($9::TEXT, court),
            case_number = COALESCE($10::TEXT, case_number),
            defendant = COALESCE($11::TEXT, defendant),
            notes = COALESCE($12::TEXT, notes),
            start_date = COALESCE($13::DATE, start_date),
            next_hearing_date = COALESCE($14::DATE, next_hearing_date),
            reminder_date = COALESCE($15::DATE, reminder_date),
            office_archive_no = COALESCE($16::TEXT, office_archive_no),
            responsible_person = COALESCE($17::TEXT, responsible_person),
            gorevlendiren = COALESCE($18::TEXT, gorevlendiren),
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
    .bind(&patch.case_name)
    .bind(&patch.description)
    .bind(&patch.case_type)
    .bind(&patch.status)
    .bind(&patch.court)
    .bind(&patch.case_number)
    .bind(&patch.defendant)
    .bind(&patch.notes)
    .bind(patch.start_date)
    .bind(patch.next_hearing_date)
    .bind(patch.reminder_date)
    .bind(&patch.office_archive_no)
    .bind(&patch.responsible_person)
    .bind(&patch.gorevlendiren)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE cases SET
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
        "UPDATE cases SET is_deleted = TRUE, updated_at = NOW() WHERE is_deleted = FALSE",
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_snapshot<'e>(
    executor: impl PgExecutor<'e>,
    record: &Case,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cases
            (id, client_id, client_name, case_name, description, case_type,
             status, court, case_number, defendant, notes, start_date,
             next_hearing_date, reminder_date, office_archive_no,
             responsible_person, gorevlendiren, version, is_deleted,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21)
        ON CONFLICT (id) DO UPDATE SET
            client_id = EXCLUDED.client_id,
            client_name = EXCLUDED.client_name,
            case_name = EXCLUDED.case_name,
            description = EXCLUDED.description,
            case_type = EXCLUDED.case_type,
            status = EXCLUDED.status,
            court = EXCLUDED.court,
            case_number = EXCLUDED.case_number,
            defendant = EXCLUDED.defendant,
            notes = EXCLUDED.notes,
            start_date = EXCLUDED.start_date,
            next_hearing_date = EXCLUDED.next_hearing_date,
            reminder_date = EXCLUDED.reminder_date,
            office_archive_no = EXCLUDED.office_archive_no,
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
    .bind(&record.case_name)
    .bind(&record.description)
    .bind(&record.case_type)
    .bind(&record.status)
    .bind(&record.court)
    .bind(&record.case_number)
    .bind(&record.defendant)
    .bind(&record.notes)
    .bind(record.start_date)
    .bind(record.next_hearing_date)
    .bind(record.reminder_date)
    .bind(&record.office_archive_no)
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
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_offset_first_page_is_zero() {
        assert_eq!(page_offset(None, DEFAULT_PAGE_SIZE), 0);
        assert_eq!(page_offset(Some(1), DEFAULT_PAGE_SIZE), 0);
        assert_eq!(page_offset(Some(0), DEFAULT_PAGE_SIZE), 0);
        assert_eq!(page_offset(Some(-3), DEFAULT_PAGE_SIZE), 0);
    }

    #[test]
    fn test_page_offset_scales_with_limit() {
        assert_eq!(page_offset(Some(2), 100), 100);
        assert_eq!(page_offset(Some(5), 20), 80);
    }

    #[test]
    fn test_page_offset_saturates_instead_of_overflowing() {
        // An absurd page number must yield a valid (non-negative) offset,
        // never wrap or panic.
        let offset = page_offset(Some(i64::MAX), MAX_PAGE_SIZE);
        assert_eq!(offset, i64::MAX);
        assert!(page_offset(Some(i64::MAX - 1), 100) >= 0);
    }
}
