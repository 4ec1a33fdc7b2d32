//! Service layer for registration, login, and session tracking.

use crate::error::ErrorKind;
use crate::user::{
    domain::{Password, Session, SessionToken, User, UserDomainError, UserEmail},
    ports::{SessionVerifier, UserRepository, UserRepositoryError},
};
use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum UserAccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// The email is already registered.
    #[error("email '{0}' is already registered")]
    AlreadyRegistered(UserEmail),
    /// No user is registered under the email.
    #[error("no user registered with email '{0}'")]
    UnknownUser(UserEmail),
    /// The password does not match the stored digest.
    #[error("invalid password for user '{0}'")]
    InvalidCredentials(UserEmail),
    /// The user already holds a live session.
    #[error("user '{0}' is already logged in")]
    AlreadyLoggedIn(UserEmail),
    /// The session is not live.
    #[error("user '{0}' is not logged in")]
    NotLoggedIn(UserEmail),
    /// The in-process session table is unusable.
    #[error("session store is unavailable")]
    SessionStoreUnavailable,
}

impl UserAccountError {
    /// Returns the boundary classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(UserRepositoryError::DuplicateUser(_)) | Self::AlreadyRegistered(_) => {
                ErrorKind::AlreadyExists
            }
            Self::Repository(UserRepositoryError::Persistence(_))
            | Self::SessionStoreUnavailable => ErrorKind::Persistence,
            Self::UnknownUser(_) => ErrorKind::NotFound,
            Self::InvalidCredentials(_) => ErrorKind::Unauthorized,
            Self::AlreadyLoggedIn(_) | Self::NotLoggedIn(_) => ErrorKind::InvalidState,
        }
    }
}

/// Result type for account service operations.
pub type UserAccountResult<T> = Result<T, UserAccountError>;

/// Registration and login orchestration service.
///
/// Live sessions are held in process memory; they are not persisted and do
/// not survive a restart. Each user may hold at most one live session.
#[derive(Clone)]
pub struct UserAccountService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    sessions: Arc<RwLock<HashMap<SessionToken, UserEmail>>>,
}

impl<R, C> UserAccountService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            sessions: Arc::default(),
        }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Domain`] when the email or password is
    /// invalid, [`UserAccountError::AlreadyRegistered`] when the email is
    /// taken, or [`UserAccountError::Repository`] when persistence fails.
    pub async fn register(&self, email: &str, password: &str) -> UserAccountResult<User> {
        let user_email = UserEmail::new(email)?;
        let validated = Password::new(password)?;

        if self.repository.find_by_email(&user_email).await?.is_some() {
            warn!(email = %user_email, "registration rejected: email already registered");
            return Err(UserAccountError::AlreadyRegistered(user_email));
        }

        let user = User::register(user_email, &validated, &*self.clock);
        self.repository.store(&user).await?;
        debug!(email = %user.email(), "user registered");
        Ok(user)
    }

    /// Checks that a password confirmation matches the password.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Domain`] when the values differ.
    pub fn confirm_password(&self, password: &str, confirmation: &str) -> UserAccountResult<()> {
        Password::confirm(password, confirmation)?;
        Ok(())
    }

    /// Logs a user in and returns a new session.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::UnknownUser`] when the email is not
    /// registered, [`UserAccountError::InvalidCredentials`] when the
    /// password is wrong, or [`UserAccountError::AlreadyLoggedIn`] when the
    /// user already holds a live session.
    pub async fn login(&self, email: &str, password: &str) -> UserAccountResult<Session> {
        let user_email = UserEmail::new(email)?;
        let user = self
            .repository
            .find_by_email(&user_email)
            .await?
            .ok_or_else(|| UserAccountError::UnknownUser(user_email.clone()))?;

        if !user.verify_password(password) {
            warn!(email = %user_email, "login rejected: invalid password");
            return Err(UserAccountError::InvalidCredentials(user_email));
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| UserAccountError::SessionStoreUnavailable)?;
        if sessions.values().any(|logged| *logged == user_email) {
            warn!(email = %user_email, "login rejected: already logged in");
            return Err(UserAccountError::AlreadyLoggedIn(user_email));
        }

        let session = Session::new(user_email);
        sessions.insert(session.token(), session.email().clone());
        debug!(email = %session.email(), "user logged in");
        Ok(session)
    }

    /// Ends a live session.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::NotLoggedIn`] when the session is not
    /// live.
    pub fn logout(&self, session: &Session) -> UserAccountResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| UserAccountError::SessionStoreUnavailable)?;
        match sessions.get(&session.token()) {
            Some(email) if email == session.email() => {
                sessions.remove(&session.token());
                debug!(email = %session.email(), "user logged out");
                Ok(())
            }
            _ => Err(UserAccountError::NotLoggedIn(session.email().clone())),
        }
    }

    /// Returns `true` when the session is live.
    #[must_use]
    pub fn is_logged_in(&self, session: &Session) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.get(&session.token()) == Some(session.email()))
            .unwrap_or(false)
    }

    /// Returns every registered user.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Repository`] when persistence lookup
    /// fails.
    pub async fn load(&self) -> UserAccountResult<Vec<User>> {
        let users = self.repository.find_all().await?;
        debug!(count = users.len(), "users loaded");
        Ok(users)
    }

    /// Deletes every user and ends every session.
    ///
    /// # Errors
    ///
    /// Returns [`UserAccountError::Repository`] when persistence fails.
    pub async fn delete_all(&self) -> UserAccountResult<()> {
        self.repository.delete_all().await?;
        self.sessions
            .write()
            .map_err(|_| UserAccountError::SessionStoreUnavailable)?
            .clear();
        debug!("all user data deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, C> SessionVerifier for UserAccountService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    async fn is_user_logged(&self, session: &Session) -> bool {
        self.is_logged_in(session)
    }
}
