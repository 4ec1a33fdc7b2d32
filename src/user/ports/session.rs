//! Authentication predicate consumed by the board core.

use crate::user::domain::Session;
use async_trait::async_trait;

/// Answers whether a session currently belongs to a logged-in user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Returns `true` when the session is live.
    async fn is_user_logged(&self, session: &Session) -> bool;
}
