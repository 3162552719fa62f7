//! Role gates: reusable authorization checks bound to an allowed-role set.
//!
//! A gate verifies the bearer token and then checks the decoded role. Gates
//! are memoized per distinct `RoleSet` in a [`GateRegistry`], so every route
//! that asks for `{user, foreman}` shares one instance regardless of the
//! order the roles were listed in.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::AuthError;
use super::jwt::{SigningSecret, verify_token};
use crate::models::auth::TokenClaims;

/// Immutable, order-independent set of role names.
///
/// An empty set marks an unprotected route. Role names are kept verbatim, so
/// a blank name still makes the set non-empty and the route protected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// The unprotected set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<const N: usize> From<[&str; N]> for RoleSet {
    fn from(roles: [&str; N]) -> Self {
        Self::new(roles)
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().collect::<Vec<_>>().join(", "))
    }
}

/// Outcome of a successful gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Unprotected route reached without a token.
    Anonymous,
    /// Token verified and role permitted.
    Authenticated(TokenClaims),
}

impl Admission {
    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            Admission::Anonymous => None,
            Admission::Authenticated(claims) => Some(claims),
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts both `Bearer <token>` and a bare token. Blank values yield `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let value = header.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Authorization check bound to one `RoleSet`.
pub struct Gate {
    roles: RoleSet,
    secret: Arc<SigningSecret>,
}

impl Gate {
    fn new(roles: RoleSet, secret: Arc<SigningSecret>) -> Self {
        Self { roles, secret }
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Admit or reject a request given its `Authorization` header value.
    ///
    /// A missing header is only acceptable on an empty `RoleSet`. A present
    /// token is always verified, even when the set is empty.
    pub fn check(&self, authorization: Option<&str>) -> Result<Admission, AuthError> {
        let Some(token) = authorization.and_then(bearer_token) else {
            if self.roles.is_empty() {
                return Ok(Admission::Anonymous);
            }
            debug!(roles = %self.roles, "gate rejected request: no token");
            return Err(AuthError::MissingToken);
        };

        let claims = verify_token(token, &self.secret).inspect_err(|e| {
            debug!(roles = %self.roles, error = %e, "gate rejected request: bad token");
        })?;

        if !self.roles.is_empty() && !self.roles.contains(&claims.role) {
            debug!(roles = %self.roles, role = %claims.role, "gate rejected request: role not permitted");
            return Err(AuthError::Forbidden(claims.role));
        }

        Ok(Admission::Authenticated(claims))
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate").field("roles", &self.roles).finish()
    }
}

/// Memo table of gates, keyed by the sorted, deduplicated `RoleSet` itself.
///
/// Construction goes through the `DashMap` entry API, which holds the shard
/// lock for the duration of the insert: racing first uses of one `RoleSet`
/// all observe the same `Arc<Gate>`.
pub struct GateRegistry {
    secret: Arc<SigningSecret>,
    gates: DashMap<RoleSet, Arc<Gate>>,
}

impl GateRegistry {
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret: Arc::new(secret),
            gates: DashMap::new(),
        }
    }

    /// Return the shared gate for `roles`, building it on first use.
    pub fn gate_for(&self, roles: impl Into<RoleSet>) -> Arc<Gate> {
        let roles = roles.into();
        self.gates
            .entry(roles.clone())
            .or_insert_with(|| {
                debug!(roles = %roles, "building role gate");
                Arc::new(Gate::new(roles, Arc::clone(&self.secret)))
            })
            .value()
            .clone()
    }

    /// Number of distinct gates built so far.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}
