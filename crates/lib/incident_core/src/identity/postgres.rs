//! PostgreSQL-backed identity store.

use async_trait::async_trait;
use sqlx::PgPool;

use super::IdentityStore;
use crate::auth::AuthError;
use crate::models::auth::{NewPrincipal, Principal, PrincipalRecord};

type PrincipalRow = (String, String, String, String, String);
type PrincipalWithHashRow = (String, String, String, String, String, String);

/// Identity store over the `users` table.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn principal_from_row((id, name, email, role, workplace_id): PrincipalRow) -> Principal {
    Principal {
        id,
        name,
        email,
        role,
        workplace_id,
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<PrincipalRecord>, AuthError> {
        let row = sqlx::query_as::<_, PrincipalWithHashRow>(
            "SELECT id::text, name, email, role, workplace_id, password_hash \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, name, email, role, workplace_id, password_hash)| {
            PrincipalRecord {
                principal: principal_from_row((id, name, email, role, workplace_id)),
                password_hash,
            }
        }))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, AuthError> {
        // Non-UUID ids can never match; avoid a cast error from PG.
        if uuid::Uuid::parse_str(id).is_err() {
            return Ok(None);
        }
        let row = sqlx::query_as::<_, PrincipalRow>(
            "SELECT id::text, name, email, role, workplace_id FROM users WHERE id = $1::uuid",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(principal_from_row))
    }

    async fn insert(&self, new: NewPrincipal) -> Result<Principal, AuthError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            "INSERT INTO users (name, email, role, workplace_id, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id::text, name, email, role, workplace_id",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.role)
        .bind(&new.workplace_id)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AuthError::Validation("Email already registered".into())
            }
            other => AuthError::DbError(other),
        })?;
        Ok(principal_from_row(row))
    }

    async fn count(&self) -> Result<i64, AuthError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
