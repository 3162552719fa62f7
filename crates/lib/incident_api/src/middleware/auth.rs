//! Role-gate middleware: Authorization header extraction, JWT verification
//! and role check, one memoized gate per route.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use incident_core::auth::gate::{Admission, Gate};
use incident_core::models::auth::TokenClaims;

use crate::error::AppError;

/// Verified claims, stored in request extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Axum middleware: runs the route's gate to completion before the handler.
///
/// The header may be `Bearer <token>` or the bare token. Rejections
/// short-circuit with the mapped `AppError`; admission with claims injects
/// `AuthenticatedUser` into request extensions.
pub async fn require_roles(
    State(gate): State<Arc<Gate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Malformed token".into()))?,
        ),
        None => None,
    };

    let admission = gate.check(header)?;

    if let Admission::Authenticated(claims) = admission {
        request.extensions_mut().insert(AuthenticatedUser(claims));
    }

    Ok(next.run(request).await)
}
