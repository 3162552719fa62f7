//! Login flow: credentials in, signed token out.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::AuthError;
use super::credentials::authenticate;
use super::jwt::{SigningSecret, issue_token};
use crate::identity::IdentityStore;
use crate::models::auth::Principal;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed access token the client presents on every later call.
    pub token: String,
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

/// Authenticate with email + password and issue an access token.
///
/// Failure kinds from [`authenticate`] propagate unchanged; collapsing
/// `NotFound` and `InvalidCredentials` for outside callers is the transport
/// layer's job.
pub async fn login(
    store: &dyn IdentityStore,
    email: &str,
    password: &str,
    secret: &SigningSecret,
    ttl: Duration,
) -> Result<Session, AuthError> {
    let principal = authenticate(store, email, password).await?;
    let issued = issue_token(&principal.id, &principal.role, secret, ttl)?;
    info!(principal_id = %principal.id, role = %principal.role, "login succeeded");
    Ok(Session {
        expires_at: issued.expires_at(),
        token: issued.token,
        principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::verify_token;
    use crate::auth::password::hash_password_with_cost;
    use crate::identity::MemoryIdentityStore;
    use crate::models::auth::NewPrincipal;

    fn secret() -> SigningSecret {
        SigningSecret::new("0123456789abcdef0123456789abcdef").unwrap()
    }

    async fn seeded_store() -> MemoryIdentityStore {
        let store = MemoryIdentityStore::new();
        for (name, email, role) in [
            ("Annie McGowan", "mcgowan@iced.1912", "user"),
            ("Carl Olof Lindblom", "lindblom@iced.1912", "foreman"),
        ] {
            store
                .insert(NewPrincipal {
                    name: name.into(),
                    email: email.into(),
                    role: role.into(),
                    workplace_id: "wp-1".into(),
                    password_hash: hash_password_with_cost("sunk123", 4).unwrap(),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn login_issues_token_carrying_stored_role() {
        let store = seeded_store().await;
        let session = login(
            &store,
            "lindblom@iced.1912",
            "sunk123",
            &secret(),
            Duration::hours(1),
        )
        .await
        .unwrap();

        let claims = verify_token(&session.token, &secret()).unwrap();
        assert_eq!(claims.role, "foreman");
        assert_eq!(claims.sub, session.principal.id);
        assert_eq!(session.expires_at.timestamp(), claims.exp);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let store = seeded_store().await;
        let err = login(&store, "mcgowan@iced.1912", "nope", &secret(), Duration::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_not_found() {
        let store = seeded_store().await;
        let err = login(&store, "ghost@iced.1912", "sunk123", &secret(), Duration::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }
}
