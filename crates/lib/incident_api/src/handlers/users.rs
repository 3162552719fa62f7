//! Principal registration and lookup handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{AuthUser, RegisterRequest};
use crate::services::auth;

/// `POST /users`: register a principal. Foreman only.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthUser>)> {
    let user = auth::register(&state, body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`: fetch a principal without its password hash.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthUser>> {
    let user = auth::get_user(&state, &id).await?;
    Ok(Json(user))
}
