//! Authentication service: login/register flows delegating to
//! `incident_core::auth` and shaping the results into API payloads.

use incident_core::auth::login::login as core_login;
use incident_core::auth::registration::{NewAccount, bootstrap_principal, register_principal};
use incident_core::identity::IdentityStore;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, LoginResponse, RegisterRequest};

/// Token type reported to clients.
const TOKEN_TYPE: &str = "Bearer";

/// Authenticate with email + password and issue an access token.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<LoginResponse> {
    let session = core_login(
        state.identities.as_ref(),
        email,
        password,
        &state.config.jwt_secret,
        state.config.token_ttl,
    )
    .await?;

    Ok(LoginResponse {
        token: session.token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: state.config.token_ttl.num_seconds(),
        user: AuthUser::from(session.principal),
    })
}

/// Register a new principal.
pub async fn register(state: &AppState, body: RegisterRequest) -> AppResult<AuthUser> {
    let principal = register_principal(
        state.identities.as_ref(),
        NewAccount {
            name: body.name,
            email: body.email,
            role: body.role,
            workplace_id: body.workplace_id,
            password: body.password,
        },
    )
    .await?;
    Ok(AuthUser::from(principal))
}

/// Fetch a principal by ID.
pub async fn get_user(state: &AppState, id: &str) -> AppResult<AuthUser> {
    state
        .identities
        .find_by_id(id)
        .await?
        .map(AuthUser::from)
        .ok_or_else(|| AppError::NotFound("Document not found".into()))
}

/// Seed the first foreman into an empty store.
pub async fn bootstrap(
    identities: &dyn IdentityStore,
    email: &str,
    password: &str,
    workplace_id: &str,
) -> AppResult<Option<AuthUser>> {
    let created = bootstrap_principal(identities, email, password, workplace_id).await?;
    Ok(created.map(AuthUser::from))
}
