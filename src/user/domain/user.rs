//! Registered user aggregate.

use super::{Password, PasswordHash, UserEmail};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    email: UserEmail,
    password_hash: PasswordHash,
    registered_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted email identity.
    pub email: UserEmail,
    /// Persisted password digest.
    pub password_hash: PasswordHash,
    /// Persisted registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Registers a new user with a validated password.
    #[must_use]
    pub fn register(email: UserEmail, password: &Password, clock: &impl Clock) -> Self {
        let password_hash = PasswordHash::derive(&email, password);
        Self {
            email,
            password_hash,
            registered_at: clock.utc(),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            email: data.email,
            password_hash: data.password_hash,
            registered_at: data.registered_at,
        }
    }

    /// Returns the user's email identity.
    #[must_use]
    pub const fn email(&self) -> &UserEmail {
        &self.email
    }

    /// Returns the stored password digest.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns `true` when the candidate password matches.
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password_hash.verify(&self.email, candidate)
    }
}
