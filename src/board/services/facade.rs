//! Service façade: one entry point per user-facing operation.
//!
//! Every operation returns a [`Response`] carrying either a value or an
//! [`ErrorReport`]. This is the only layer that flattens typed errors into
//! a kind and a message, and it logs each failure once.

use super::registry::{BoardRegistry, BoardRegistryError};
use crate::board::{
    domain::{Board, BoardId, BoardKey, BoardPolicy, Column, ColumnId, TaskId, TaskView},
    ports::BoardRepository,
};
use crate::error::ErrorKind;
use crate::user::{
    domain::{Session, UserDomainError, UserEmail},
    ports::UserRepository,
    services::{UserAccountError, UserAccountService},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can cross the façade.
#[derive(Debug, Error)]
pub enum KanbanError {
    /// Account or session failure.
    #[error(transparent)]
    Accounts(#[from] UserAccountError),
    /// Board registry failure.
    #[error(transparent)]
    Boards(#[from] BoardRegistryError),
    /// Malformed user input.
    #[error(transparent)]
    Input(#[from] UserDomainError),
}

impl KanbanError {
    /// Returns the boundary classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Accounts(err) => err.kind(),
            Self::Boards(err) => err.kind(),
            Self::Input(err) => err.kind(),
        }
    }
}

/// Failure description returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Failure class.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&KanbanError> for ErrorReport {
    fn from(err: &KanbanError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a façade operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response<T> {
    /// Operation result on success.
    pub value: Option<T>,
    /// Failure description on error.
    pub error: Option<ErrorReport>,
}

impl<T> Response<T> {
    /// Creates a successful response.
    #[must_use]
    pub const fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub const fn failed(report: ErrorReport) -> Self {
        Self {
            value: None,
            error: Some(report),
        }
    }

    /// Returns `true` when the operation succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the failure class, if any.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|report| report.kind)
    }

    /// Converts the response into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorReport`] of a failed response.
    pub fn into_result(self) -> Result<T, ErrorReport> {
        match (self.value, self.error) {
            (_, Some(report)) => Err(report),
            (Some(value), None) => Ok(value),
            (None, None) => Err(ErrorReport {
                kind: ErrorKind::InvalidState,
                message: "response carries neither value nor error".to_owned(),
            }),
        }
    }
}

impl<T: Serialize> Response<T> {
    /// Serializes the response as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] when the value cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Serializable snapshot of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    /// Column identifier.
    pub id: ColumnId,
    /// Column name.
    pub name: String,
    /// Column position.
    pub ordinal: usize,
    /// Work limit, `None` when unlimited.
    pub limit: Option<usize>,
    /// Tasks in insertion order.
    pub tasks: Vec<TaskView>,
}

impl From<&Column> for ColumnView {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id(),
            name: column.name().to_owned(),
            ordinal: column.ordinal(),
            limit: column.limit(),
            tasks: column.tasks().iter().map(TaskView::from).collect(),
        }
    }
}

/// Serializable snapshot of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Board identifier.
    pub id: BoardId,
    /// Registry key.
    pub key: BoardKey,
    /// Members in join order.
    pub members: Vec<UserEmail>,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnView>,
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id(),
            key: board.key(),
            members: board.members().to_vec(),
            columns: board.columns().iter().map(ColumnView::from).collect(),
        }
    }
}

/// Counts reported after loading persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSummary {
    /// Registered users.
    pub users: usize,
    /// Loaded boards.
    pub boards: usize,
}

type Accounts<UR, C> = UserAccountService<UR, C>;

/// Entry point combining accounts and boards.
pub struct KanbanFacade<BR, UR, C>
where
    BR: BoardRepository,
    UR: UserRepository,
    C: Clock + Send + Sync,
{
    accounts: Arc<Accounts<UR, C>>,
    registry: BoardRegistry<BR, Accounts<UR, C>, C>,
}

impl<BR, UR, C> KanbanFacade<BR, UR, C>
where
    BR: BoardRepository,
    UR: UserRepository,
    C: Clock + Send + Sync,
{
    /// Wires the account service and the board registry together.
    #[must_use]
    pub fn new(
        board_repository: Arc<BR>,
        user_repository: Arc<UR>,
        clock: Arc<C>,
        policy: BoardPolicy,
    ) -> Self {
        let accounts = Arc::new(UserAccountService::new(user_repository, Arc::clone(&clock)));
        let registry = BoardRegistry::new(board_repository, Arc::clone(&accounts), clock, policy);
        Self { accounts, registry }
    }

    /// Loads users and boards from storage.
    pub async fn load_data(&mut self) -> Response<DataSummary> {
        let result = async {
            let users = self.accounts.load().await?.len();
            let boards = self.registry.load().await?;
            Ok::<_, KanbanError>(DataSummary { users, boards })
        }
        .await;
        respond("load_data", result)
    }

    /// Deletes every board and user.
    pub async fn delete_data(&mut self) -> Response<()> {
        let result = async {
            self.registry.delete_all().await?;
            self.accounts.delete_all().await?;
            Ok::<_, KanbanError>(())
        }
        .await;
        respond("delete_data", result)
    }

    /// Registers a user.
    pub async fn register(&self, email: &str, password: &str) -> Response<UserEmail> {
        let result = self
            .accounts
            .register(email, password)
            .await
            .map(|user| user.email().clone());
        respond("register", result)
    }

    /// Checks a password confirmation.
    #[must_use]
    pub fn confirm_password(&self, password: &str, confirmation: &str) -> Response<()> {
        respond(
            "confirm_password",
            self.accounts.confirm_password(password, confirmation),
        )
    }

    /// Logs a user in.
    pub async fn login(&self, email: &str, password: &str) -> Response<Session> {
        respond("login", self.accounts.login(email, password).await)
    }

    /// Logs a session out.
    #[must_use]
    pub fn logout(&self, session: &Session) -> Response<()> {
        respond("logout", self.accounts.logout(session))
    }

    /// Sets a column limit.
    pub async fn limit_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        limit: usize,
    ) -> Response<()> {
        let result = self.registry.limit_column(session, key, ordinal, limit).await;
        respond("limit_column", result)
    }

    /// Clears a column limit.
    pub async fn remove_column_limit(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> Response<()> {
        let result = self.registry.remove_column_limit(session, key, ordinal).await;
        respond("remove_column_limit", result)
    }

    /// Returns a column limit; the value is `Some(None)` when unlimited.
    pub async fn column_limit(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> Response<Option<usize>> {
        let result = self.registry.column_limit(session, key, ordinal).await;
        respond("column_limit", result)
    }

    /// Returns a column name.
    pub async fn column_name(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> Response<String> {
        let result = self
            .registry
            .column_name(session, key, ordinal)
            .await
            .map(str::to_owned);
        respond("column_name", result)
    }

    /// Creates a task in the backlog.
    pub async fn add_task(
        &mut self,
        session: &Session,
        key: &BoardKey,
        title: &str,
        description: &str,
        due: DateTime<Utc>,
    ) -> Response<TaskView> {
        let result = self
            .registry
            .add_task(session, key, title, description, due)
            .await;
        respond("add_task", result)
    }

    /// Replaces a task due date.
    pub async fn update_task_due_date(
        &mut self,
        session: &Session,
        key: &BoardKey,
        task: TaskId,
        ordinal: usize,
        due: DateTime<Utc>,
    ) -> Response<()> {
        let result = self
            .registry
            .update_task_due(session, key, task, ordinal, due)
            .await;
        respond("update_task_due_date", result)
    }

    /// Replaces a task title.
    pub async fn update_task_title(
        &mut self,
        session: &Session,
        key: &BoardKey,
        task: TaskId,
        ordinal: usize,
        title: &str,
    ) -> Response<()> {
        let result = self
            .registry
            .update_task_title(session, key, task, ordinal, title)
            .await;
        respond("update_task_title", result)
    }

    /// Replaces a task description.
    pub async fn update_task_description(
        &mut self,
        session: &Session,
        key: &BoardKey,
        task: TaskId,
        ordinal: usize,
        description: &str,
    ) -> Response<()> {
        let result = self
            .registry
            .update_task_description(session, key, task, ordinal, description)
            .await;
        respond("update_task_description", result)
    }

    /// Moves a task to the next column.
    pub async fn advance_task(
        &mut self,
        session: &Session,
        key: &BoardKey,
        task: TaskId,
        ordinal: usize,
    ) -> Response<()> {
        let result = self.registry.advance_task(session, key, task, ordinal).await;
        respond("advance_task", result)
    }

    /// Returns the tasks of a column.
    pub async fn column_tasks(
        &self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> Response<Vec<TaskView>> {
        let result = self.registry.column_tasks(session, key, ordinal).await;
        respond("column_tasks", result)
    }

    /// Creates a board owned by the session user.
    pub async fn add_board(&mut self, session: &Session, name: &str) -> Response<BoardView> {
        let result = self
            .registry
            .add_board(session, name)
            .await
            .map(BoardView::from);
        respond("add_board", result)
    }

    /// Joins a board.
    pub async fn join_board(&mut self, session: &Session, key: &BoardKey) -> Response<()> {
        let result = self.registry.join_board(session, key).await;
        respond("join_board", result)
    }

    /// Deletes a board.
    pub async fn remove_board(&mut self, session: &Session, key: &BoardKey) -> Response<()> {
        let result = self.registry.remove_board(session, key).await;
        respond("remove_board", result)
    }

    /// Returns the session user's in-progress tasks across boards.
    pub async fn in_progress_tasks(&self, session: &Session) -> Response<Vec<TaskView>> {
        let result = self.registry.in_progress_tasks(session).await;
        respond("in_progress_tasks", result)
    }

    /// Reassigns a task to a board member.
    pub async fn assign_task(
        &mut self,
        session: &Session,
        key: &BoardKey,
        task: TaskId,
        ordinal: usize,
        assignee: &str,
    ) -> Response<()> {
        let result = async {
            let email = UserEmail::new(assignee)?;
            self.registry
                .assign_task(session, key, task, ordinal, email)
                .await?;
            Ok::<_, KanbanError>(())
        }
        .await;
        respond("assign_task", result)
    }

    /// Returns the keys of the boards the session user can access.
    pub async fn board_names(&self, session: &Session) -> Response<Vec<BoardKey>> {
        respond("board_names", self.registry.board_names(session).await)
    }

    /// Inserts a column.
    pub async fn add_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        name: &str,
    ) -> Response<()> {
        let result = self.registry.add_column(session, key, ordinal, name).await;
        respond("add_column", result)
    }

    /// Removes a column, merging its tasks into a neighbour.
    pub async fn remove_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
    ) -> Response<()> {
        let result = self.registry.remove_column(session, key, ordinal).await;
        respond("remove_column", result)
    }

    /// Renames a column.
    pub async fn rename_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        name: &str,
    ) -> Response<()> {
        let result = self.registry.rename_column(session, key, ordinal, name).await;
        respond("rename_column", result)
    }

    /// Moves an empty column by `shift` positions.
    pub async fn move_column(
        &mut self,
        session: &Session,
        key: &BoardKey,
        ordinal: usize,
        shift: isize,
    ) -> Response<()> {
        let result = self.registry.move_column(session, key, ordinal, shift).await;
        respond("move_column", result)
    }

    /// Returns a board's columns.
    pub async fn columns(&self, session: &Session, key: &BoardKey) -> Response<Vec<ColumnView>> {
        let result = self
            .registry
            .columns(session, key)
            .await
            .map(|columns| columns.iter().map(ColumnView::from).collect());
        respond("columns", result)
    }

    /// Returns the boards the session user can access.
    pub async fn boards(&self, session: &Session) -> Response<Vec<BoardView>> {
        let result = self
            .registry
            .boards(session)
            .await
            .map(|boards| boards.into_iter().map(BoardView::from).collect());
        respond("boards", result)
    }

    /// Returns the board holding a task.
    pub async fn task_board(&self, session: &Session, task: TaskId) -> Response<BoardView> {
        let result = self
            .registry
            .task_board(session, task)
            .await
            .map(BoardView::from);
        respond("task_board", result)
    }

    /// Returns the column holding a task.
    pub async fn task_column(&self, session: &Session, task: TaskId) -> Response<ColumnView> {
        let result = self
            .registry
            .task_column(session, task)
            .await
            .map(ColumnView::from);
        respond("task_column", result)
    }
}

fn respond<T, E>(operation: &'static str, result: Result<T, E>) -> Response<T>
where
    E: Into<KanbanError>,
{
    match result {
        Ok(value) => {
            debug!(operation, "operation succeeded");
            Response::ok(value)
        }
        Err(err) => {
            let error: KanbanError = err.into();
            let report = ErrorReport::from(&error);
            warn!(operation, kind = %report.kind, error = %report.message, "operation failed");
            Response::failed(report)
        }
    }
}
