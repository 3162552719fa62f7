//! Principal registration and first-run bootstrap.

use tracing::info;

use super::AuthError;
use super::password::hash_password;
use crate::identity::IdentityStore;
use crate::models::auth::{NewPrincipal, Principal};

/// Role granted to the bootstrap principal; it is the role allowed to
/// register further principals.
pub const BOOTSTRAP_ROLE: &str = "foreman";

/// Registration input with a plaintext password.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub role: String,
    pub workplace_id: String,
    pub password: String,
}

/// Hash the password and insert a new principal.
pub async fn register_principal(
    store: &dyn IdentityStore,
    account: NewAccount,
) -> Result<Principal, AuthError> {
    for (field, value) in [
        ("name", &account.name),
        ("email", &account.email),
        ("role", &account.role),
        ("workplaceId", &account.workplace_id),
        ("password", &account.password),
    ] {
        if value.trim().is_empty() {
            return Err(AuthError::Validation(format!("{field} is required")));
        }
    }

    let NewAccount {
        name,
        email,
        role,
        workplace_id,
        password,
    } = account;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("password hashing task: {e}")))??;

    let principal = store
        .insert(NewPrincipal {
            name,
            email,
            role,
            workplace_id,
            password_hash,
        })
        .await?;
    info!(principal_id = %principal.id, role = %principal.role, "principal registered");
    Ok(principal)
}

/// Create the first principal when the store is empty.
///
/// Returns `None` when principals already exist.
pub async fn bootstrap_principal(
    store: &dyn IdentityStore,
    email: &str,
    password: &str,
    workplace_id: &str,
) -> Result<Option<Principal>, AuthError> {
    if store.count().await? > 0 {
        return Ok(None);
    }
    let principal = register_principal(
        store,
        NewAccount {
            name: "Bootstrap foreman".into(),
            email: email.into(),
            role: BOOTSTRAP_ROLE.into(),
            workplace_id: workplace_id.into(),
            password: password.into(),
        },
    )
    .await?;
    info!(email, "bootstrap principal created");
    Ok(Some(principal))
}
