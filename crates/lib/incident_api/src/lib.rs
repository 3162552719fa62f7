//! # incident_api
//!
//! HTTP API library for incident reporting: login, registration and the
//! per-route role gates that protect everything else.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use incident_core::auth::gate::{GateRegistry, RoleSet};
use incident_core::identity::IdentityStore;
use tower_http::cors::CorsLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, users};
use crate::middleware::auth::require_roles;

/// Roles allowed to read principals.
pub const STAFF_ROLES: [&str; 2] = ["user", "foreman"];

/// Roles allowed to register principals.
pub const REGISTRAR_ROLES: [&str; 1] = ["foreman"];

/// Roles allowed to inspect their own session.
pub const SESSION_ROLES: [&str; 3] = ["user", "foreman", "admin"];

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where principals and password hashes live.
    pub identities: Arc<dyn IdentityStore>,
    /// API configuration.
    pub config: ApiConfig,
    /// Memoized role gates, shared by every route.
    pub gates: Arc<GateRegistry>,
}

impl AppState {
    pub fn new(identities: Arc<dyn IdentityStore>, config: ApiConfig) -> Self {
        let gates = Arc::new(GateRegistry::new(config.jwt_secret.clone()));
        Self {
            identities,
            config,
            gates,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let staff = state.gates.gate_for(RoleSet::from(STAFF_ROLES));
    let registrar = state.gates.gate_for(RoleSet::from(REGISTRAR_ROLES));
    let session = state.gates.gate_for(RoleSet::from(SESSION_ROLES));

    // Public routes (no gate)
    let public = Router::new()
        .route("/login", post(auth::login_handler))
        .route("/login/email", post(auth::login_handler));

    // Gated routes, one gate per role combination
    let gated = Router::new()
        .route(
            "/login/session",
            get(auth::session_handler).route_layer(from_fn_with_state(session, require_roles)),
        )
        .route(
            "/users",
            post(users::register_handler).route_layer(from_fn_with_state(registrar, require_roles)),
        )
        .route(
            "/users/{id}",
            get(users::get_user_handler).route_layer(from_fn_with_state(staff, require_roles)),
        );

    Router::new()
        .merge(public)
        .merge(gated)
        .layer(cors)
        .with_state(state)
}

