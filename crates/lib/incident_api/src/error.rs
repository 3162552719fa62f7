//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use incident_core::auth::AuthError;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database unavailable: {0}")]
    DbUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::DbUnavailable(m) => {
                (StatusCode::SERVICE_UNAVAILABLE, "db_unavailable", m.as_str())
            }
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m.as_str()),
            AppError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::DbUnavailable(e.to_string())
            }
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            // Unknown email and wrong password look identical from outside.
            AuthError::NotFound | AuthError::InvalidCredentials => {
                debug!(kind = %e, "credentials rejected");
                AppError::Unauthorized("Invalid credentials".into())
            }
            AuthError::MissingToken => {
                AppError::Unauthorized("Missing authorization header".into())
            }
            AuthError::Malformed => AppError::Unauthorized("Malformed token".into()),
            AuthError::InvalidSignature => {
                AppError::Unauthorized("Invalid token signature".into())
            }
            AuthError::Expired => AppError::Unauthorized("Token expired".into()),
            AuthError::Forbidden(_) => AppError::Forbidden("User unauthorised".into()),
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::DbError(e) => AppError::from(e),
            AuthError::Configuration(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: AuthError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn credential_failures_are_indistinguishable() {
        let not_found = AppError::from(AuthError::NotFound);
        let wrong_password = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(not_found.to_string(), wrong_password.to_string());
        assert_eq!(status_of(AuthError::NotFound), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn token_failures_are_unauthorized() {
        for e in [
            AuthError::MissingToken,
            AuthError::Malformed,
            AuthError::InvalidSignature,
            AuthError::Expired,
        ] {
            assert_eq!(status_of(e), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn role_failure_is_forbidden() {
        assert_eq!(
            status_of(AuthError::Forbidden("user".into())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn validation_is_bad_request() {
        assert_eq!(
            status_of(AuthError::Validation("email is required".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_faults_hide_detail() {
        assert_eq!(
            status_of(AuthError::Internal("bcrypt hash: boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(AuthError::Configuration("x".into())).to_string(),
            "Internal server error"
        );
    }
}
