//! Board registry: every board in the process, behind session checks.

use crate::board::{
    domain::{
        Board, BoardDomainError, BoardKey, BoardName, BoardPolicy, Column, ColumnSet, TaskDraft,
        TaskId, TaskView,
    },
    ports::{BoardRepository, BoardRepositoryError},
};
use crate::error::ErrorKind;
use crate::user::{
    domain::{Session, UserEmail},
    ports::SessionVerifier,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum BoardRegistryError {
    /// Domain validation or state-machine failure.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
    /// No board is registered under the key.
    #[error("board '{0}' not found")]
    BoardNotFound(BoardKey),
    /// A board is already registered under the key.
    #[error("board '{0}' already exists")]
    BoardAlreadyExists(BoardKey),
    /// The session is not live.
    #[error("user '{0}' is not logged in")]
    NotLoggedIn(UserEmail),
    /// The user is neither creator nor member of the board.
    #[error("user '{user}' has no access to board '{board}'")]
    NotBoardMember {
        /// Acting user.
        user: UserEmail,
        /// Board being accessed.
        board: BoardKey,
    },
    /// Only the creator may perform the operation.
    #[error("user '{user}' did not create board '{board}'")]
    NotCreator {
        /// Acting user.
        user: UserEmail,
        /// Board being accessed.
        board: BoardKey,
    },
    /// The user already joined the board.
    #[error("user '{user}' already joined board '{board}'")]
    AlreadyMember {
        /// Acting user.
        user: UserEmail,
        /// Board being joined.
        board: BoardKey,
    },
    /// No accessible board holds the task.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

impl BoardRegistryError {
    /// Returns the boundary classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(BoardRepositoryError::NotFound(_))
            | Self::BoardNotFound(_)
            | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Repository(BoardRepositoryError::DuplicateBoard(_))
            | Self::BoardAlreadyExists(_)
            | Self::AlreadyMember { .. } => ErrorKind::AlreadyExists,
            Self::Repository(BoardRepositoryError::Persistence(_)) => ErrorKind::Persistence,
            Self::NotLoggedIn(_) | Self::NotBoardMember { .. } | Self::NotCreator { .. } => {
                ErrorKind::Unauthorized
            }
        }
    }
}

/// Result type for registry operations.
pub type BoardRegistryResult<T> = Result<T, BoardRegistryError>;

/// Owner of every loaded board, keyed by creator and name.
///
/// Mutations run against a copy of the board, are persisted, and only then
/// replace the registered board. A rejected operation or a failed write
/// leaves the registry as it was.
pub struct BoardRegistry<R, A, C>
where
    R: BoardRepository,
    A: SessionVerifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    sessions: Arc<A>,
    clock: Arc<C>,
    policy: BoardPolicy,
    boards: BTreeMap<BoardKey, Board>,
}

impl<R, A, C> BoardRegistry<R, A, C>
where
    R: BoardRepository,
    A: SessionVerifier,
    C: Clock + Send + Sync,
{
    /// Creates an empty registry.
    #[must_use]
    pub const fn new(repository: Arc<R>, sessions: Arc<A>, clock: Arc<C>, policy: BoardPolicy) -> Self {
        Self {
            repository,
            sessions,
            clock,
            policy,
            boards: BTreeMap::new(),
        }
    }

    /// Returns the policy applied to new boards and tasks.
    #[must_use]
    pub const fn policy(&self) -> &BoardPolicy {
        &self.policy
    }

    /// Replaces the registered boards with the stored ones.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::Repository`] when loading fails; the
    /// registry keeps its previous boards in that case.
    pub async fn load(&mut self) -> BoardRegistryResult<usize> {
        let stored = self.repository.find_all().await?;
        self.boards = stored.into_iter().map(|board| (board.key(), board)).collect();
        debug!(count = self.boards.len(), "boards loaded");
        Ok(self.boards.len())
    }

    /// Deletes every stored and registered board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::Repository`] when the wipe fails.
    pub async fn delete_all(&mut self) -> BoardRegistryResult<()> {
        self.repository.delete_all().await?;
        self.boards.clear();
        debug!("all boards deleted");
        Ok(())
    }

    /// Creates a board owned by the session user, who joins it at once.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`], a name validation error,
    /// or [`BoardRegistryError::BoardAlreadyExists`].
    pub async fn add_board(&mut self, session: &Session, name: &str) -> BoardRegistryResult<&Board> {
        self.ensure_logged_in(session).await?;
        let board_name = BoardName::new(name)?;
        let key = BoardKey::new(session.email().clone(), board_name.clone());
        if self.boards.contains_key(&key) {
            return Err(BoardRegistryError::BoardAlreadyExists(key));
        }

        let mut board = Board::new(session.email().clone(), board_name, &self.policy)?;
        board.join(session.email().clone());
        self.repository.store(&board).await?;
        debug!(board = %key, "board created");
        Ok(&*self.boards.entry(key).or_insert(board))
    }

    /// Returns a board the session user created or joined.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::BoardNotFound`],
    /// [`BoardRegistryError::NotLoggedIn`], or
    /// [`BoardRegistryError::NotBoardMember`].
    pub async fn board(&self, session: &Session, key: &BoardKey) -> BoardRegistryResult<&Board> {
        let board = self
            .boards
            .get(key)
            .ok_or_else(|| BoardRegistryError::BoardNotFound(key.clone()))?;
        self.ensure_logged_in(session).await?;
        if !board.is_accessible_by(session.email()) {
            return Err(BoardRegistryError::NotBoardMember {
                user: session.email().clone(),
                board: key.clone(),
            });
        }
        Ok(board)
    }

    /// Deletes a board with its columns, tasks, and memberships.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`] or
    /// [`BoardRegistryError::NotCreator`] before
    /// [`BoardRegistryError::BoardNotFound`].
    pub async fn remove_board(&mut self, session: &Session, key: &BoardKey) -> BoardRegistryResult<()> {
        self.ensure_logged_in(session).await?;
        if *session.email() != key.creator {
            return Err(BoardRegistryError::NotCreator {
                user: session.email().clone(),
                board: key.clone(),
            });
        }
        let id = self
            .boards
            .get(key)
            .map(Board::id)
            .ok_or_else(|| BoardRegistryError::BoardNotFound(key.clone()))?;

        self.repository.delete(id).await?;
        self.boards.remove(key);
        debug!(board = %key, "board removed");
        Ok(())
    }

    /// Adds the session user to a board's members.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`],
    /// [`BoardRegistryError::BoardNotFound`], or
    /// [`BoardRegistryError::AlreadyMember`].
    pub async fn join_board(&mut self, session: &Session, key: &BoardKey) -> BoardRegistryResult<()> {
        self.ensure_logged_in(session).await?;
        let board = self
            .boards
            .get(key)
            .ok_or_else(|| BoardRegistryError::BoardNotFound(key.clone()))?;
        if board.is_member(session.email()) {
            return Err(BoardRegistryError::AlreadyMember {
                user: session.email().clone(),
                board: key.clone(),
            });
        }

        let mut draft = board.clone();
        draft.join(session.email().clone());
        self.commit(key, draft).await?;
        debug!(board = %key, user = %session.email(), "user joined board");
        Ok(())
    }

    /// Returns the session user's tasks in the in-progress columns of every
    /// board they joined.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`].
    pub async fn in_progress_tasks(&self, session: &Session) -> BoardRegistryResult<Vec<TaskView>> {
        self.ensure_logged_in(session).await?;
        let email = session.email();
        let mut views = Vec::new();
        for board in self.boards.values().filter(|board| board.is_member(email)) {
            views.extend(board.in_progress_tasks(email)?.into_iter().map(TaskView::from));
        }
        Ok(views)
    }

    /// Returns the keys of the boards the session user can access.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`].
    pub async fn board_names(&self, session: &Session) -> BoardRegistryResult<Vec<BoardKey>> {
        Ok(self
            .boards(session)
            .await?
            .into_iter()
            .map(Board::key)
            .collect())
    }

    /// Returns the boards the session user can access.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`].
    pub async fn boards(&self, session: &Session) -> BoardRegistryResult<Vec<&Board>> {
        self.ensure_logged_in(session).await?;
        Ok(self.accessible(session.email()))
    }

    /// Returns the accessible board holding the task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`] or
    /// [`BoardRegistryError::TaskNotFound`].
    pub async fn task_board(&self, session: &Session, id: TaskId) -> BoardRegistryResult<&Board> {
        self.ensure_logged_in(session).await?;
        self.accessible(session.email())
            .into_iter()
            .find(|board| board.find_task(id).is_some())
            .ok_or(BoardRegistryError::TaskNotFound(id))
    }

    /// Returns the column holding the task on an accessible board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRegistryError::NotLoggedIn`] or
    /// [`BoardRegistryError::TaskNotFound`].
    pub async fn task_column(&self, session: &Session, id: TaskId) -> BoardRegistryResult<&Column> {
        let board = self.task_board(session, id).await?;
        let (ordinal, _) = board
            .find_task(id)
            .ok_or(BoardRegistryError::TaskNotFound(id))?;
        Ok(board.columns().column(ordinal)?)
    }

    /// Returns a board's columns.
    ///
    /// # Errors
    ///
    /// Fails the board access check.
    pub async fn columns(&self, session: &Session, key: &BoardKey) -> BoardRegistryResult<&ColumnSet> {
        Ok(self.board(session, key).await?.columns())
    }

    /// Returns one column of a board.
    ///
    /// # Errors
    ///
    /// Fails the board access check or returns a column lookup error.
    pub async fn column(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> BoardRegistryResult<&Column> {
        Ok(self.columns(session, key).await?.column(ordinal)?)
    }

    /// Returns a column limit, `None` when unlimited.
    ///
    /// # Errors
    ///
    /// Fails the board access check or returns a column lookup error.
    pub async fn column_limit(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> BoardRegistryResult<Option<usize>> {
        Ok(self.column(session, key, ordinal).await?.limit())
    }

    /// Returns a column name.
    ///
    /// # Errors
    ///
    /// Fails the board access check or returns a column lookup error.
    pub async fn column_name(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> BoardRegistryResult<&str> {
        Ok(self.column(session, key, ordinal).await?.name())
    }

    /// Returns the tasks of a column.
    ///
    /// # Errors
    ///
    /// Fails the board access check or returns a column lookup error.
    pub async fn column_tasks(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> BoardRegistryResult<Vec<TaskView>> {
        let column = self.column(session, key, ordinal).await?;
        Ok(column.tasks().iter().map(TaskView::from).collect())
    }

    /// Creates a task in the backlog, assigned to the session user.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the task validation.
    pub async fn add_task(
        &mut self,
        session: &Session,
        key: &BoardKey,
        title: &str,
        description: &str,
        due: DateTime<Utc>,
    ) -> BoardRegistryResult<TaskView> {
        let draft = TaskDraft {
            title: title.to_owned(),
            description: description.to_owned(),
            assignee: session.email().clone(),
            due,
        };
        let limits = self.policy.task_limits();
        let clock = Arc::clone(&self.clock);
        let view = self
            .modify(session, key, |board| {
                board.add_task(draft, limits, &*clock).map(TaskView::from)
            })
            .await?;
        debug!(board = %key, task = %view.id, "task added");
        Ok(view)
    }

    /// Replaces a task title.
    ///
    /// # Errors
    ///
    /// Fails the board access check, the editing gates, or the validation.
    pub async fn update_task_title(
        &mut self,
        session: &Session,
        key: &BoardKey,
        id: TaskId,
        ordinal: usize,
        title: &str,
    ) -> BoardRegistryResult<()> {
        let limits = self.policy.task_limits();
        let user = session.email().clone();
        self.modify(session, key, |board| {
            board.update_task_title(id, ordinal, &user, title, limits)
        })
        .await
    }

    /// Replaces a task description.
    ///
    /// # Errors
    ///
    /// Fails the board access check, the editing gates, or the validation.
    pub async fn update_task_description(
        &mut self,
        session: &Session,
        key: &BoardKey,
        id: TaskId,
        ordinal: usize,
        description: &str,
    ) -> BoardRegistryResult<()> {
        let limits = self.policy.task_limits();
        let user = session.email().clone();
        self.modify(session, key, |board| {
            board.update_task_description(id, ordinal, &user, description, limits)
        })
        .await
    }

    /// Replaces a task due date.
    ///
    /// # Errors
    ///
    /// Fails the board access check, the editing gates, or the validation.
    pub async fn update_task_due(
        &mut self,
        session: &Session,
        key: &BoardKey,
        id: TaskId,
        ordinal: usize,
        due: DateTime<Utc>,
    ) -> BoardRegistryResult<()> {
        let clock = Arc::clone(&self.clock);
        let user = session.email().clone();
        self.modify(session, key, |board| {
            board.update_task_due(id, ordinal, &user, due, &*clock)
        })
        .await
    }

    /// Moves a task to the next column.
    ///
    /// # Errors
    ///
    /// Fails the board access check, the editing gates, or the target limit.
    pub async fn advance_task(
        &mut self,
        session: &Session,
        key: &BoardKey,
        id: TaskId,
        ordinal: usize,
    ) -> BoardRegistryResult<()> {
        let user = session.email().clone();
        self.modify(session, key, |board| board.advance_task(id, ordinal, &user))
            .await?;
        debug!(board = %key, task = %id, from = ordinal, "task advanced");
        Ok(())
    }

    /// Reassigns a task to a board member.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the assignment rules.
    pub async fn assign_task(
        &mut self,
        session: &Session,
        key: &BoardKey,
        id: TaskId,
        ordinal: usize,
        assignee: UserEmail,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.assign_task(id, ordinal, assignee))
            .await
    }

    /// Inserts a column.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the column rules.
    pub async fn add_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        name: &str,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.add_column(ordinal, name))
            .await
    }

    /// Removes a column, merging its tasks into a neighbour.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the column rules.
    pub async fn remove_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.remove_column(ordinal))
            .await
    }

    /// Renames a column.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the column rules.
    pub async fn rename_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        name: &str,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.rename_column(ordinal, name))
            .await
    }

    /// Moves an empty column.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the column rules.
    pub async fn move_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        shift: isize,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.move_column(ordinal, shift))
            .await
    }

    /// Sets a column limit.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the limit rules.
    pub async fn limit_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        limit: usize,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.limit_column(ordinal, limit))
            .await
    }

    /// Clears a column limit.
    ///
    /// # Errors
    ///
    /// Fails the board access check or the column lookup.
    pub async fn remove_column_limit(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> BoardRegistryResult<()> {
        self.modify(session, key, |board| board.remove_column_limit(ordinal))
            .await
    }

    async fn ensure_logged_in(&self, session: &Session) -> BoardRegistryResult<()> {
        if self.sessions.is_user_logged(session).await {
            Ok(())
        } else {
            Err(BoardRegistryError::NotLoggedIn(session.email().clone()))
        }
    }

    fn accessible(&self, email: &UserEmail) -> Vec<&Board> {
        self.boards
            .values()
            .filter(|board| board.is_accessible_by(email))
            .collect()
    }

    async fn modify<T, F>(
        &mut self,
        session: &Session,
        key: &BoardKey,
        operation: F,
    ) -> BoardRegistryResult<T>
    where
        F: FnOnce(&mut Board) -> Result<T, BoardDomainError>,
    {
        let mut draft = self.board(session, key).await?.clone();
        let value = operation(&mut draft)?;
        self.commit(key, draft).await?;
        Ok(value)
    }

    async fn commit(&mut self, key: &BoardKey, draft: Board) -> BoardRegistryResult<()> {
        self.repository.update(&draft).await?;
        self.boards.insert(key.clone(), draft);
        Ok(())
    }
}
