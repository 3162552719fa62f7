//! Login and session handlers.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, LoginResponse, SessionResponse};
use crate::services::auth;

/// `POST /login` (and `/login/email`): authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(&state, &body.email, &body.password).await?;
    Ok(Json(resp))
}

/// `GET /login/session`: echo the caller's verified claims.
pub async fn session_handler(
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Json<SessionResponse> {
    Json(SessionResponse::from(&claims))
}
