//! API server configuration.

use axum::http::HeaderValue;
use chrono::Duration;
use incident_core::auth::AuthError;
use incident_core::auth::jwt::{SigningSecret, resolve_jwt_secret, resolve_token_ttl};

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default allowed browser origin (the Vite dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Browser origin allowed by CORS.
    pub cors_origin: HeaderValue,
    /// JWT signing secret.
    pub jwt_secret: SigningSecret,
    /// Lifetime of issued access tokens.
    pub token_ttl: Duration,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                       | Default                  |
    /// |--------------------------------|--------------------------|
    /// | `BIND_ADDR`                    | `127.0.0.1:3000`         |
    /// | `CORS_ORIGIN`                  | `http://localhost:5173`  |
    /// | `JWT_SECRET_KEY` / `JWT_SECRET`| none: startup fails      |
    /// | `JWT_TTL_SECS`                 | `3600`                   |
    pub fn from_env() -> Result<Self, AuthError> {
        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into());
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            cors_origin: parse_origin(&cors_origin)?,
            jwt_secret: resolve_jwt_secret()?,
            token_ttl: resolve_token_ttl()?,
        })
    }

    /// Configuration with defaults around an explicit secret.
    pub fn with_secret(jwt_secret: SigningSecret) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            jwt_secret,
            token_ttl: Duration::seconds(incident_core::auth::jwt::DEFAULT_TOKEN_TTL_SECS),
        }
    }
}

/// Parse a CORS origin header value.
pub fn parse_origin(origin: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(origin.trim())
        .map_err(|e| AuthError::Configuration(format!("CORS_ORIGIN '{origin}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_secret_uses_one_hour_ttl() {
        let secret = SigningSecret::new("0123456789abcdef0123456789abcdef").unwrap();
        let config = ApiConfig::with_secret(secret);
        assert_eq!(config.token_ttl, Duration::hours(1));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn parse_origin_rejects_control_characters() {
        assert!(parse_origin("http://localhost:5173").is_ok());
        assert!(matches!(
            parse_origin("http://bad\norigin"),
            Err(AuthError::Configuration(_))
        ));
    }
}
