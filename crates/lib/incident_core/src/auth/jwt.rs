//! JWT token issuance and verification.
//!
//! Tokens are HS256-signed and stateless: nothing is stored server-side and
//! an issued token stays valid until its `exp`, there is no revocation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Access token lifetime when `JWT_TTL_SECS` is unset: 1 hour.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Longest accepted access token lifetime: 30 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Minimum signing secret length in bytes (the HS256 key size).
pub const MIN_SECRET_LEN: usize = 32;

/// Environment variables consulted for the signing secret, in order.
pub const SECRET_ENV_VARS: &[&str] = &["JWT_SECRET_KEY", "JWT_SECRET"];

/// Environment variable holding the token lifetime in seconds.
pub const TTL_ENV_VAR: &str = "JWT_TTL_SECS";

/// Well-known values that are never accepted as a signing secret.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "OOPSY-DAISY",
    "secret",
    "changeme",
    "change-me",
    "jwt-secret",
    "your-secret-key",
];

/// HMAC key used to sign and verify tokens.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Accept a secret, rejecting empty, placeholder and short values.
    pub fn new(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::Configuration("signing secret is empty".into()));
        }
        if PLACEHOLDER_SECRETS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(secret.trim()))
        {
            return Err(AuthError::Configuration(
                "signing secret is a well-known placeholder".into(),
            ));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Configuration(format!(
                "signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// A freshly signed token and the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

impl IssuedToken {
    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.claims.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Generate a signed JWT access token (HS256) expiring `ttl` from now.
pub fn issue_token(
    subject: &str,
    role: &str,
    secret: &SigningSecret,
    ttl: Duration,
) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Internal(format!("token lifetime out of range: {ttl}")))?;
    let claims = TokenClaims {
        sub: subject.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))?;
    Ok(IssuedToken { token, claims })
}

/// Verify a JWT access token, returning the claims on success.
///
/// The signature is checked before the expiry, so a forged token reports
/// `InvalidSignature` even when its claimed `exp` is in the past.
pub fn verify_token(token: &str, secret: &SigningSecret) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Malformed,
        })
}

/// Resolve the signing secret from the process environment.
pub fn resolve_jwt_secret() -> Result<SigningSecret, AuthError> {
    resolve_jwt_secret_with(|name| std::env::var(name).ok())
}

/// Resolve the signing secret through `lookup`: `JWT_SECRET_KEY` → `JWT_SECRET`.
///
/// There is no fallback value; an unset secret is a configuration error.
pub fn resolve_jwt_secret_with(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SigningSecret, AuthError> {
    for name in SECRET_ENV_VARS {
        if let Some(secret) = lookup(name)
            && !secret.is_empty()
        {
            return SigningSecret::new(secret).map_err(|e| match e {
                AuthError::Configuration(msg) => AuthError::Configuration(format!("{name}: {msg}")),
                other => other,
            });
        }
    }
    Err(AuthError::Configuration(format!(
        "signing secret not set (expected one of {})",
        SECRET_ENV_VARS.join(", ")
    )))
}

/// Resolve the token lifetime from `JWT_TTL_SECS` (default 1 hour).
pub fn resolve_token_ttl() -> Result<Duration, AuthError> {
    parse_token_ttl(std::env::var(TTL_ENV_VAR).ok().as_deref())
}

/// Parse a token lifetime in whole seconds; `None` means the default.
pub fn parse_token_ttl(raw: Option<&str>) -> Result<Duration, AuthError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Duration::seconds(DEFAULT_TOKEN_TTL_SECS));
    };
    match raw.parse::<i64>() {
        Ok(secs) if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) => Duration::try_seconds(secs)
            .ok_or_else(|| {
                AuthError::Configuration(format!("{TTL_ENV_VAR} out of range, got '{raw}'"))
            }),
        _ => Err(AuthError::Configuration(format!(
            "{TTL_ENV_VAR} must be between 1 and {MAX_TOKEN_TTL_SECS} seconds, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn secret() -> SigningSecret {
        SigningSecret::new("0123456789abcdef0123456789abcdef").unwrap()
    }

    fn other_secret() -> SigningSecret {
        SigningSecret::new("fedcba9876543210fedcba9876543210").unwrap()
    }

    #[test]
    fn issued_token_verifies_and_round_trips_claims() {
        let issued = issue_token("principal-1", "foreman", &secret(), Duration::hours(1)).unwrap();
        let claims = verify_token(&issued.token, &secret()).unwrap();
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.sub, "principal-1");
        assert_eq!(claims.role, "foreman");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_has_three_segments() {
        let issued = issue_token("p", "user", &secret(), Duration::hours(1)).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = issue_token("p", "user", &secret(), Duration::seconds(-120)).unwrap();
        assert!(matches!(
            verify_token(&issued.token, &secret()),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let issued = issue_token("p", "admin", &secret(), Duration::hours(1)).unwrap();
        assert!(matches!(
            verify_token(&issued.token, &other_secret()),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_wins_over_expiry() {
        let issued = issue_token("p", "admin", &secret(), Duration::seconds(-120)).unwrap();
        assert!(matches!(
            verify_token(&issued.token, &other_secret()),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let issued = issue_token("p", "user", &secret(), Duration::hours(1)).unwrap();
        let forged = issue_token("p", "admin", &other_secret(), Duration::hours(1)).unwrap();

        // Splice the admin payload onto the user token's header and signature.
        let parts: Vec<&str> = issued.token.split('.').collect();
        let forged_parts: Vec<&str> = forged.token.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(
            verify_token(&spliced, &secret()),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_tokens_are_reported_as_malformed() {
        for token in ["", "not-a-token", "a.b", "a.b.c.d", "!!!.???.###"] {
            assert!(
                matches!(verify_token(token, &secret()), Err(AuthError::Malformed)),
                "expected Malformed for {token:?}"
            );
        }
    }

    #[test]
    fn signing_secret_rejects_weak_values() {
        assert!(matches!(
            SigningSecret::new(""),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            SigningSecret::new("OOPSY-DAISY"),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            SigningSecret::new("too-short"),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn signing_secret_debug_is_redacted() {
        let rendered = format!("{:?}", secret());
        assert!(!rendered.contains("0123456789"));
    }

    #[test]
    fn resolve_secret_requires_a_value() {
        let env: HashMap<&str, String> = HashMap::new();
        let err = resolve_jwt_secret_with(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn resolve_secret_prefers_jwt_secret_key() {
        let env = HashMap::from([
            ("JWT_SECRET_KEY", "k".repeat(40)),
            ("JWT_SECRET", "s".repeat(40)),
        ]);
        let resolved = resolve_jwt_secret_with(|k| env.get(k).cloned()).unwrap();
        assert_eq!(resolved.as_bytes(), "k".repeat(40).as_bytes());
    }

    #[test]
    fn resolve_secret_falls_back_to_jwt_secret() {
        let env = HashMap::from([("JWT_SECRET_KEY", String::new()), ("JWT_SECRET", "s".repeat(40))]);
        let resolved = resolve_jwt_secret_with(|k| env.get(k).cloned()).unwrap();
        assert_eq!(resolved.as_bytes(), "s".repeat(40).as_bytes());
    }

    #[test]
    fn resolve_secret_rejects_placeholder() {
        let env = HashMap::from([("JWT_SECRET_KEY", "OOPSY-DAISY".to_string())]);
        let err = resolve_jwt_secret_with(|k| env.get(k).cloned()).unwrap_err();
        match err {
            AuthError::Configuration(msg) => assert!(msg.starts_with("JWT_SECRET_KEY")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ttl_defaults_to_one_hour() {
        assert_eq!(parse_token_ttl(None).unwrap(), Duration::hours(1));
        assert_eq!(parse_token_ttl(Some("  ")).unwrap(), Duration::hours(1));
    }

    #[test]
    fn ttl_parses_seconds() {
        assert_eq!(parse_token_ttl(Some("900")).unwrap(), Duration::minutes(15));
    }

    #[test]
    fn ttl_rejects_out_of_range_values() {
        for raw in ["99999999999999999", "9000000000000", "2592001"] {
            assert!(matches!(
                parse_token_ttl(Some(raw)),
                Err(AuthError::Configuration(_))
            ));
        }
        assert_eq!(
            parse_token_ttl(Some("2592000")).unwrap(),
            Duration::days(30)
        );
    }

    #[test]
    fn issue_with_overflowing_ttl_is_an_error() {
        let err = issue_token("p", "user", &secret(), Duration::MAX).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn ttl_rejects_nonsense() {
        for raw in ["0", "-5", "1h", "abc"] {
            assert!(matches!(
                parse_token_ttl(Some(raw)),
                Err(AuthError::Configuration(_))
            ));
        }
    }
}
