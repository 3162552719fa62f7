//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API payloads
//! (which are camelCase and built from these in `incident_api`).

use serde::{Deserialize, Serialize};

/// An identity that can log in. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Open role name (e.g. `user`, `foreman`, `admin`).
    pub role: String,
    pub workplace_id: String,
}

/// Principal with password hash (for internal auth flows only).
#[derive(Debug, Clone)]
pub struct PrincipalRecord {
    pub principal: Principal,
    pub password_hash: String,
}

/// A principal to be inserted into an identity store.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub name: String,
    pub email: String,
    pub role: String,
    pub workplace_id: String,
    pub password_hash: String,
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: principal ID (standard JWT `sub` claim).
    pub sub: String,
    /// Principal role at issuance.
    pub role: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}
