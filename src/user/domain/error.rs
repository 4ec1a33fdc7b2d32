//! Error types for user account validation.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The email address is empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,

    /// The email address is not of the form `local@domain.tld`.
    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),

    /// The password length falls outside the accepted range.
    #[error("password must be between {min} and {max} characters, got {actual}")]
    PasswordLength {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected password.
        actual: usize,
    },

    /// The password lacks an uppercase letter, a lowercase letter, or a
    /// digit.
    #[error("password must include an uppercase letter, a lowercase letter, and a digit")]
    PasswordComposition,

    /// The password appears on the list of most common passwords.
    #[error("password is too common")]
    CommonPassword,

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl UserDomainError {
    /// Returns the boundary classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
