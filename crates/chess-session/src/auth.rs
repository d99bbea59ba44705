//! Authentication context passed explicitly into a [`Session`](crate::Session).
//!
//! The session never stores tokens anywhere but in memory. Whoever owns the
//! [`AuthContext`] decides where a token lives between runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer token issued by the persistence gateway.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        AuthToken(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Authentication state of a session: a token when signed in, nothing when not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<AuthToken>,
}

impl AuthContext {
    /// A context with no token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context holding `token`.
    pub fn with_token(token: AuthToken) -> Self {
        AuthContext { token: Some(token) }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn install(&mut self, token: AuthToken) {
        self.token = Some(token);
    }

    pub(crate) fn clear(&mut self) {
        self.token = None;
    }
}

/// Username and password submitted to `login` or `register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
