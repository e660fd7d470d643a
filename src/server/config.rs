/**
 * Server Configuration
 *
 * Loads the optional PostgreSQL connection from the environment.
 * Configuration errors are logged but never abort startup: without a
 * database the server still answers, returning 503 from data routes.
 */

use sqlx::PgPool;

/// Database connection pool, or `None` when unconfigured/unreachable.
pub type DatabaseConfig = Option<PgPool>;

/// Read `DATABASE_URL`, connect, and run pending migrations.
///
/// Returns `None` if the variable is unset or the connection fails;
/// the caller runs in degraded mode in that case.
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Data routes will answer 503.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");
    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Continuing without a database. Data routes will answer 503.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            // A partially migrated schema surfaces as query errors later;
            // startup itself still succeeds.
            tracing::error!("Failed to run database migrations: {:?}", e);
        }
    }

    Some(pool)
}

/// Port the HTTP server binds, from `SERVER_PORT` (default 8000).
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(8000)
}
