//! Domain model for user accounts and sessions.
//!
//! Users are identified by a normalized email. Passwords are validated on
//! registration and only their salted digest is kept.

mod email;
mod error;
mod password;
mod session;
mod user;

pub use email::UserEmail;
pub use error::UserDomainError;
pub use password::{Password, PasswordHash};
pub use session::{Session, SessionToken};
pub use user::{PersistedUserData, User};
