/**
 * Application Error Types
 *
 * This module defines the error taxonomy for the LexCloud backend.
 * Every mutating operation surfaces one of these variants so callers can
 * tell apart the recovery actions: re-fetch and retry (version conflict),
 * abandon (not found), or fix the input (validation / reference).
 *
 * # Error Categories
 *
 * - `NotFound` - no live (non-deleted) record with the given id
 * - `VersionConflict` - optimistic lock token mismatch; recoverable by
 *   re-reading and retrying
 * - `Reference` - a referenced foreign record is missing or soft-deleted
 * - `Validation` - malformed or missing required field
 * - `Unauthorized` - authentication failure
 * - `Database` / `Serialization` - infrastructure failures
 * - `ServiceUnavailable` - the database pool is not configured
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Error type covering every failure the HTTP handlers can produce.
///
/// Delivery failures on notification channels are deliberately absent:
/// they are contained inside the connection registry and never surfaced
/// to a mutation caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// No live record with the given id.
    #[error("{entity} not found")]
    NotFound {
        /// Entity kind name, e.g. "Client"
        entity: &'static str,
    },

    /// Optimistic lock token mismatch.
    ///
    /// The caller supplied an expected version that differs from the
    /// stored one. The record was left completely unchanged.
    #[error("{entity} was modified by another request (expected version {expected}, found {found})")]
    VersionConflict {
        /// Entity kind name
        entity: &'static str,
        /// Version the caller asserted
        expected: i32,
        /// Version actually stored
        found: i32,
    },

    /// A referenced foreign record does not exist or is soft-deleted.
    #[error("referenced {entity} does not exist or was deleted")]
    Reference {
        /// Referenced entity kind name
        entity: &'static str,
    },

    /// Malformed or missing required field.
    #[error("validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: &'static str,
        /// Human-readable error message
        message: String,
    },

    /// Authentication failure (bad password or invalid token).
    #[error("unauthorized")]
    Unauthorized,

    /// Database is not configured (no `DATABASE_URL`).
    #[error("database not available")]
    ServiceUnavailable,

    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Create a `NotFound` error for an entity kind.
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Create a `VersionConflict` error.
    pub fn conflict(entity: &'static str, expected: i32, found: i32) -> Self {
        Self::VersionConflict {
            entity,
            expected,
            found,
        }
    }

    /// Create a `Reference` error for a missing or deleted foreign record.
    pub fn reference(entity: &'static str) -> Self {
        Self::Reference { entity }
    }

    /// Create a `Validation` error for a field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404
    /// - `VersionConflict` - 409
    /// - `Reference` - 400
    /// - `Validation` - 422
    /// - `Unauthorized` - 401
    /// - `ServiceUnavailable` - 503
    /// - `Database` / `Serialization` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::VersionConflict { .. } => StatusCode::CONFLICT,
            Self::Reference { .. } => StatusCode::BAD_REQUEST,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_not_found_status() {
        let error = AppError::not_found("Client");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "Client not found");
    }

    #[test]
    fn test_version_conflict_status() {
        let error = AppError::conflict("Case", 1, 2);
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert!(error.to_string().contains("expected version 1"));
    }

    #[test]
    fn test_reference_status() {
        let error = AppError::reference("Client");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_status() {
        let error = AppError::validation("name", "must not be empty");
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error.to_string().contains("name"));
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_service_unavailable_status() {
        assert_eq!(
            AppError::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_database_error_conversion() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert_matches!(error, AppError::Database(_));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
