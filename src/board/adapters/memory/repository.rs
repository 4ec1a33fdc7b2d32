//! In-memory repository for board tests and ephemeral runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{Board, BoardId},
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};

/// Thread-safe in-memory board repository.
///
/// Cloning the repository shares the underlying state, so a clone handed
/// to a registry observes the same boards as the original.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<HashMap<BoardId, Board>>>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> BoardRepositoryError {
    BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut boards = self.state.write().map_err(poisoned)?;
        if boards.contains_key(&board.id()) {
            return Err(BoardRepositoryError::DuplicateBoard(board.id()));
        }
        boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut boards = self.state.write().map_err(poisoned)?;
        let stored = boards
            .get_mut(&board.id())
            .ok_or(BoardRepositoryError::NotFound(board.id()))?;
        *stored = board.clone();
        Ok(())
    }

    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()> {
        let mut boards = self.state.write().map_err(poisoned)?;
        boards
            .remove(&id)
            .map(|_| ())
            .ok_or(BoardRepositoryError::NotFound(id))
    }

    async fn find_all(&self) -> BoardRepositoryResult<Vec<Board>> {
        let boards = self.state.read().map_err(poisoned)?;
        Ok(boards.values().cloned().collect())
    }

    async fn delete_all(&self) -> BoardRepositoryResult<()> {
        self.state.write().map_err(poisoned)?.clear();
        Ok(())
    }
}
