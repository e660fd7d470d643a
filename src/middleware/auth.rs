/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require an
 * authenticated viewer session. It extracts and verifies the JWT from the
 * Authorization header and attaches the session to request extensions.
 */

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::auth::sessions::verify_token;

/// Authenticated viewer session extracted from the JWT.
#[derive(Clone, Debug)]
pub struct AuthSession {
    /// Session id; also the subscriber identity for notification routing.
    pub session_id: String,
}

/// Authentication middleware
///
/// 1. Extracts the JWT from the Authorization header (`Bearer <token>`)
/// 2. Verifies the token
/// 3. Attaches [`AuthSession`] to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(AuthSession {
        session_id: claims.sub,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::sessions::create_session_token;

    #[test]
    fn test_bearer_prefix_required() {
        let token = create_session_token().unwrap();
        // A raw token without the Bearer prefix must not pass the strip.
        assert!(token.strip_prefix("Bearer ").is_none());
        assert!(format!("Bearer {}", token).strip_prefix("Bearer ").is_some());
    }
}
