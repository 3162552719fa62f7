//! Password hashing via bcrypt.

use tracing::debug;

use super::AuthError;

/// bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10). The salt and cost are encoded in
/// the output, so every call yields a different string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with_cost(password, BCRYPT_COST)
}

/// Hash a password with an explicit bcrypt cost.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
///
/// An unreadable stored hash verifies as `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matched) => matched,
        Err(e) => {
            debug!(error = %e, "stored password hash could not be verified");
            false
        }
    }
}
