//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT issuance and verification, credential
//! checks, the login flow and memoized role gates. Shared by `incident_api`
//! and anything else that needs to admit or reject a principal.

pub mod credentials;
pub mod gate;
pub mod jwt;
pub mod login;
pub mod password;
pub mod registration;

use thiserror::Error;

/// Authentication errors.
///
/// Every kind is a separate decision point for the caller; the transport
/// layer decides what becomes visible to clients.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No principal registered for email")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Role '{0}' is not permitted")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
