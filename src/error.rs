//! Error classification shared by every bounded context.
//!
//! Domain and service errors stay as rich `thiserror` enums inside their
//! modules. [`ErrorKind`] is the coarse taxonomy that crosses the service
//! façade so callers can branch on the failure class without parsing
//! messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure class reported at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A field value failed validation (title, description, due date,
    /// email, password).
    Validation,
    /// A call parameter is out of range or malformed.
    InvalidArgument,
    /// A referenced entity does not exist.
    NotFound,
    /// The caller lacks the required session, membership, or assignment.
    Unauthorized,
    /// A column work-in-progress limit would be exceeded.
    LimitReached,
    /// A board or membership already exists.
    AlreadyExists,
    /// The operation is not allowed in the current state.
    InvalidState,
    /// The persistence collaborator failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::LimitReached => "limit_reached",
            Self::AlreadyExists => "already_exists",
            Self::InvalidState => "invalid_state",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
