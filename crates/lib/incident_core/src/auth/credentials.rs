//! Credential verification: email lookup plus bcrypt check.

use std::sync::LazyLock;

use tracing::debug;

use super::AuthError;
use super::password::{hash_password, verify_password};
use crate::identity::IdentityStore;
use crate::models::auth::Principal;

/// Hash checked for unknown emails, so both failure paths cost one bcrypt
/// verification at the production cost.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("incident-dummy-password").ok());

/// Run `verify_password` on the blocking pool. `None` checks against the
/// dummy hash, which is also built there on first use.
async fn verify_off_thread(password: &str, hash: Option<String>) -> Result<bool, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || match hash.as_deref().or_else(|| DUMMY_HASH.as_deref()) {
        Some(hash) => verify_password(&password, hash),
        None => false,
    })
    .await
    .map_err(|e| AuthError::Internal(format!("password verification task: {e}")))
}

/// Authenticate with email + password.
///
/// Returns `NotFound` when no principal has this exact email and
/// `InvalidCredentials` when the password does not match. Both paths do the
/// same bcrypt work, on the blocking pool, with no lock held.
pub async fn authenticate(
    store: &dyn IdentityStore,
    email: &str,
    password: &str,
) -> Result<Principal, AuthError> {
    let Some(record) = store.find_by_email(email).await? else {
        verify_off_thread(password, None).await?;
        debug!("authentication failed: unknown email");
        return Err(AuthError::NotFound);
    };

    let matched = verify_off_thread(password, Some(record.password_hash)).await?;

    if !matched {
        debug!(principal_id = %record.principal.id, "authentication failed: password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    Ok(record.principal)
}
