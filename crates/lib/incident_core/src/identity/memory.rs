use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::IdentityStore;
use crate::auth::AuthError;
use crate::models::auth::{NewPrincipal, Principal, PrincipalRecord};

/// In-memory identity store keyed by principal ID.
#[derive(Default)]
pub struct MemoryIdentityStore {
    records: RwLock<HashMap<String, PrincipalRecord>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<PrincipalRecord>, AuthError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.principal.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, AuthError> {
        let records = self.records.read().await;
        Ok(records.get(id).map(|r| r.principal.clone()))
    }

    async fn insert(&self, new: NewPrincipal) -> Result<Principal, AuthError> {
        let mut records = self.records.write().await;
        if records.values().any(|r| r.principal.email == new.email) {
            return Err(AuthError::Validation("Email already registered".into()));
        }
        let principal = Principal {
            id: Uuid::now_v7().to_string(),
            name: new.name,
            email: new.email,
            role: new.role,
            workplace_id: new.workplace_id,
        };
        records.insert(
            principal.id.clone(),
            PrincipalRecord {
                principal: principal.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(principal)
    }

    async fn count(&self) -> Result<i64, AuthError> {
        Ok(self.records.read().await.len() as i64)
    }
}
