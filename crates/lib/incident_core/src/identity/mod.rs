//! Identity store: where principals and their password hashes live.
//!
//! The auth flows only read from the store (plus inserts on registration),
//! so the trait is deliberately narrow. Two backends are provided: an
//! in-memory map for tests and single-process development, and PostgreSQL.

mod memory;
mod postgres;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;

use async_trait::async_trait;

use crate::auth::AuthError;
use crate::models::auth::{NewPrincipal, Principal, PrincipalRecord};

/// Read/insert access to registered principals.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch a principal and its password hash by exact email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<PrincipalRecord>, AuthError>;

    /// Fetch a principal (without hash) by ID.
    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, AuthError>;

    /// Insert a new principal. A duplicate email is a `Validation` error.
    async fn insert(&self, principal: NewPrincipal) -> Result<Principal, AuthError>;

    /// Count registered principals.
    async fn count(&self) -> Result<i64, AuthError>;
}
