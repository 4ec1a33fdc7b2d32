//! Password validation and digest types.

use super::{UserDomainError, UserEmail};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const MIN_PASSWORD_LENGTH: usize = 4;
const MAX_PASSWORD_LENGTH: usize = 20;

/// Passwords rejected regardless of composition, compared case-insensitively.
const COMMON_PASSWORDS: [&str; 20] = [
    "123456",
    "123456789",
    "qwerty",
    "password",
    "1111111",
    "12345678",
    "abc123",
    "1234567",
    "password1",
    "12345",
    "1234567890",
    "123123",
    "000000",
    "iloveyou",
    "1234",
    "1q2w3e4r5t",
    "qwertyuiop",
    "123",
    "monkey",
    "dragon",
];

/// Plain-text password that passed the strength rules.
///
/// The value is only held long enough to derive a [`PasswordHash`]; it is
/// never persisted and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validates a candidate password.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::CommonPassword`] for well-known weak
    /// passwords, [`UserDomainError::PasswordLength`] outside 4..=20
    /// characters, or [`UserDomainError::PasswordComposition`] when an
    /// uppercase letter, lowercase letter, or digit is missing.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let lowered = raw.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            return Err(UserDomainError::CommonPassword);
        }

        let length = raw.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(UserDomainError::PasswordLength {
                min: MIN_PASSWORD_LENGTH,
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            });
        }

        let has_upper = raw.chars().any(char::is_uppercase);
        let has_lower = raw.chars().any(char::is_lowercase);
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        if !(has_upper && has_lower && has_digit) {
            return Err(UserDomainError::PasswordComposition);
        }

        Ok(Self(raw))
    }

    /// Checks that a confirmation entry matches the password.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::PasswordMismatch`] when the values differ.
    pub fn confirm(password: &str, confirmation: &str) -> Result<(), UserDomainError> {
        if password == confirmation {
            Ok(())
        } else {
            Err(UserDomainError::PasswordMismatch)
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Hex-encoded SHA-256 digest of an email-salted password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derives the digest for a user's password.
    #[must_use]
    pub fn derive(email: &UserEmail, password: &Password) -> Self {
        Self(digest(email, password.expose()))
    }

    /// Wraps a digest loaded from persistence.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns `true` when the candidate password produces this digest.
    ///
    /// The candidate is not strength-checked, so legacy passwords stored
    /// under older rules still verify.
    #[must_use]
    pub fn verify(&self, email: &UserEmail, candidate: &str) -> bool {
        self.0 == digest(email, candidate)
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn digest(email: &UserEmail, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
