//! In-memory repository for user account tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{User, UserEmail},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<HashMap<UserEmail, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(poisoned)?;
        if users.contains_key(user.email()) {
            return Err(UserRepositoryError::DuplicateUser(user.email().clone()));
        }
        users.insert(user.email().clone(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &UserEmail) -> UserRepositoryResult<Option<User>> {
        let users = self.state.read().map_err(poisoned)?;
        Ok(users.get(email).cloned())
    }

    async fn find_all(&self) -> UserRepositoryResult<Vec<User>> {
        let users = self.state.read().map_err(poisoned)?;
        Ok(users.values().cloned().collect())
    }

    async fn delete_all(&self) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(poisoned)?;
        users.clear();
        Ok(())
    }
}
