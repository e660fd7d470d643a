/**
 * Shared Password Storage
 *
 * The application authenticates every viewer against one shared password.
 * Its bcrypt hash lives in the `app_settings` table so a password change
 * survives restarts; the hash is seeded from the `APP_PASSWORD`
 * environment variable on first startup.
 */

use sqlx::PgPool;

use crate::error::AppError;

const PASSWORD_HASH_KEY: &str = "password_hash";

/// Fetch the stored bcrypt hash of the shared password.
pub async fn get_password_hash(pool: &PgPool) -> Result<Option<String>, AppError> {
    #[derive(sqlx::FromRow)]
    struct ValueRow {
        value: String,
    }

    let row = sqlx::query_as::<_, ValueRow>(
        "SELECT value FROM app_settings WHERE key = $1",
    )
    .bind(PASSWORD_HASH_KEY)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.value))
}

/// Replace the stored password hash.
pub async fn set_password_hash(pool: &PgPool, hash: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO app_settings (key, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE SET
            value = EXCLUDED.value,
            updated_at = NOW()
        "#,
    )
    .bind(PASSWORD_HASH_KEY)
    .bind(hash)
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the password hash from `APP_PASSWORD` if none is stored yet.
///
/// Called once during startup. Errors are logged by the caller; a missing
/// seed only means logins fail until a password is configured.
pub async fn ensure_password_seeded(pool: &PgPool) -> Result<(), AppError> {
    if get_password_hash(pool).await?.is_some() {
        return Ok(());
    }

    let password = match std::env::var("APP_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            tracing::warn!("APP_PASSWORD not set and no stored password; logins will be rejected");
            return Ok(());
        }
    };

    let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::validation("password", format!("failed to hash: {}", e)))?;
    set_password_hash(pool, &hash).await?;
    tracing::info!("Seeded shared password hash from APP_PASSWORD");

    Ok(())
}

/// Verify a candidate password against the stored hash.
pub async fn verify_password(pool: &PgPool, candidate: &str) -> Result<bool, AppError> {
    let Some(hash) = get_password_hash(pool).await? else {
        return Ok(false);
    };

    bcrypt::verify(candidate, &hash)
        .map_err(|e| AppError::validation("password", format!("verification failed: {}", e)))
}
