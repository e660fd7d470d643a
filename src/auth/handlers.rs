/**
 * Authentication Handlers
 *
 * This module implements the login and change-password endpoints.
 *
 * # Authentication Process
 *
 * 1. Verify the submitted password against the stored bcrypt hash
 * 2. Mint a fresh session id and issue a JWT
 * 3. Return the token; the client sends it as a Bearer header and in the
 *    WebSocket path
 *
 * # Security
 *
 * - The shared password is verified with bcrypt
 * - Bad credentials return 401 with no further detail
 * - The password hash never appears in responses or logs
 */

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::password::{set_password_hash, verify_password};
use crate::auth::sessions::create_session_token;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Login handler (POST /api/login)
///
/// # Errors
///
/// * `401 Unauthorized` - wrong password or no password configured
/// * `503 Service Unavailable` - database not configured
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;

    if !verify_password(&pool, &request.password).await? {
        tracing::warn!("Login rejected: wrong password");
        return Err(AppError::Unauthorized);
    }

    let token = create_session_token().map_err(|e| {
        tracing::error!("Token generation failed: {:?}", e);
        AppError::Unauthorized
    })?;

    tracing::info!("Login accepted, new viewer session issued");
    Ok(Json(LoginResponse { token }))
}

/// Change-password handler (POST /api/auth/change-password)
///
/// Requires the current password even though the caller is already
/// authenticated, so a stolen token alone cannot rotate the password.
///
/// # Errors
///
/// * `401 Unauthorized` - current password is wrong
/// * `422 Unprocessable Entity` - new password is empty or too short
pub async fn change_password(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let pool = pool.ok_or(AppError::ServiceUnavailable)?;

    if request.new_password.trim().len() < 4 {
        return Err(AppError::validation(
            "new_password",
            "password must be at least 4 characters",
        ));
    }

    if !verify_password(&pool, &request.current_password).await? {
        tracing::warn!("Password change rejected: wrong current password");
        return Err(AppError::Unauthorized);
    }

    let hash = bcrypt::hash(&request.new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::validation("new_password", format!("failed to hash: {}", e)))?;
    set_password_hash(&pool, &hash).await?;

    tracing::info!("Shared password changed");
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserializes() {
        let request: LoginRequest = serde_json::from_str(r#"{"password":"hunter2"}"#).unwrap();
        assert_eq!(request.password, "hunter2");
    }

    #[test]
    fn test_change_password_request_field_names() {
        let request: ChangePasswordRequest = serde_json::from_str(
            r#"{"current_password":"old","new_password":"new-secret"}"#,
        )
        .unwrap();
        assert_eq!(request.current_password, "old");
        assert_eq!(request.new_password, "new-secret");
    }
}
