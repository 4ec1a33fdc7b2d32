//! Explicit login sessions.

use super::UserEmail;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque token identifying one login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Creates a new random session token.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability handed out on login and passed into every board operation.
///
/// Holding a `Session` is not proof of authentication on its own; the
/// session must still be live according to a
/// [`SessionVerifier`](crate::user::ports::SessionVerifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    token: SessionToken,
    email: UserEmail,
}

impl Session {
    /// Creates a session for a user with a fresh token.
    #[must_use]
    pub fn new(email: UserEmail) -> Self {
        Self {
            token: SessionToken::new(),
            email,
        }
    }

    /// Returns the session token.
    #[must_use]
    pub const fn token(&self) -> SessionToken {
        self.token
    }

    /// Returns the email of the user acting through this session.
    #[must_use]
    pub const fn email(&self) -> &UserEmail {
        &self.email
    }
}
