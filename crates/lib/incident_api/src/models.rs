//! Request and response payloads (camelCase on the wire).

use chrono::{DateTime, Utc};
use incident_core::models::auth::{Principal, TokenClaims};
use serde::{Deserialize, Serialize};

/// Error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `POST /login` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Principal as exposed to clients (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub workplace_id: String,
}

impl From<Principal> for AuthUser {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            role: p.role,
            workplace_id: p.workplace_id,
        }
    }
}

/// Successful login: the token plus the user it was issued to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: AuthUser,
}

/// `POST /users` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    pub workplace_id: String,
    pub password: String,
}

/// Decoded claims of the caller's token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub role: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&TokenClaims> for SessionResponse {
    fn from(c: &TokenClaims) -> Self {
        Self {
            user_id: c.sub.clone(),
            role: c.role.clone(),
            issued_at: DateTime::from_timestamp(c.iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(c.exp, 0).unwrap_or_default(),
        }
    }
}
