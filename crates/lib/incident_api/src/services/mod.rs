//! Service layer between handlers and `incident_core`.

pub mod auth;
