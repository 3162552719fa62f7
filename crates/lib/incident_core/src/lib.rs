//! # incident_core
//!
//! Core authentication and authorization logic for incident reporting.

pub mod auth;
pub mod identity;
pub mod migrate;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
