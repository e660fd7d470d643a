/**
 * Database Operations for Client Records
 *
 * All reads exclude soft-deleted rows. The update statement is a single
 * compare-and-swap: the version check happens in the WHERE clause, so a
 * lost race surfaces as zero affected rows rather than a silently
 * overwritten write.
 */

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::clients::model::{Client, ClientUpdate};

/// Fetch a live client by id.
pub async fn fetch_live(pool: &PgPool, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "SELECT * FROM clients WHERE id = $1 AND is_deleted = FALSE",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List all live clients, most recently updated first.
pub async fn list_live(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "SELECT * FROM clients WHERE is_deleted = FALSE ORDER BY updated_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// Insert a freshly created record.
pub async fn insert(pool: &PgPool, record: &Client) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO clients
            (id, name, email, phone, address, tax_id, vekalet_ofis_no,
             version, is_deleted, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.address)
    .bind(&record.tax_id)
    .bind(&record.vekalet_ofis_no)
    .bind(record.version)
    .bind(record.is_deleted)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Compare-and-swap update.
///
/// Applies only the fields present in the patch, bumps the version by 1
/// and touches `updated_at`. Returns `None` when no live row matched -
/// either the id is gone or the expected version lost the race; the
/// caller tells those apart with a follow-up [`fetch_live`].
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    expected_version: Option<i32>,
    patch: &ClientUpdate,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients SET
            name = COALESCE($3::TEXT, name),
            email = COALESCE($4::TEXT, email),
            phone = COALESCE($5::TEXT, phone),
            address = COALESCE($6::TEXT, address),
            tax_id = COALESCE($7::TEXT, tax_id),
            vekalet_ofis_no = COALESCE($8::TEXT, vekalet_ofis_no),
            version = version + 1,
            updated_at = NOW()
        WHERE id = $1 AND is_deleted = FALSE
          AND ($2::INTEGER IS NULL OR version = $2)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(expected_version)
    .bind(&patch.name)
    .bind(&patch.email)
    .bind(&patch.phone)
    .bind(&patch.address)
    .bind(&patch.tax_id)
    .bind(&patch.vekalet_ofis_no)
    .fetch_optional(pool)
    .await
}

/// Soft-delete a live client. Bumps the version so the optimistic-lock
/// counter stays uniform across every mutation kind.
///
/// Returns false when no live row matched.
pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE clients SET
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

/// Mark every live client as deleted. Used inside the restore transaction.
pub async fn mark_all_deleted<'e>(executor: impl PgExecutor<'e>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE clients SET is_deleted = TRUE, updated_at = NOW() WHERE is_deleted = FALSE",
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Re-create a record from a backup snapshot, preserving its id, version
/// and timestamps. Upserts so a restore can revive a soft-deleted row
/// with the same primary key.
pub async fn insert_snapshot<'e>(
    executor: impl PgExecutor<'e>,
    record: &Client,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO clients
            (id, name, email, phone, address, tax_id, vekalet_ofis_no,
             version, is_deleted, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            address = EXCLUDED.address,
            tax_id = EXCLUDED.tax_id,
            vekalet_ofis_no = EXCLUDED.vekalet_ofis_no,
            version = EXCLUDED.version,
            is_deleted = EXCLUDED.is_deleted,
            created_at = EXCLUDED.created_at,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.address)
    .bind(&record.tax_id)
    .bind(&record.vekalet_ofis_no)
    .bind(record.version)
    .bind(record.is_deleted)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}
