//! Port contracts for user accounts.
//!
//! Ports define infrastructure-agnostic interfaces used by account
//! services and by the board core.

pub mod repository;
pub mod session;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
pub use session::SessionVerifier;

#[cfg(test)]
pub use repository::MockUserRepository;
#[cfg(test)]
pub use session::MockSessionVerifier;
