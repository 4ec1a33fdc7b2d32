//! Board aggregate root: columns, membership, and the task state machine.

use super::{
    BoardDomainError, BoardId, BoardKey, BoardName, BoardPolicy, Column, ColumnSet, Task,
    TaskDraft, TaskId, TaskLimits,
};
use crate::user::domain::UserEmail;
use chrono::{DateTime, Utc};
use mockable::Clock;

/// A Kanban board.
///
/// A task moves forward one column at a time from the backlog (ordinal 0)
/// to the done column (the last ordinal). Tasks in the done column are
/// frozen. Only the assignee may edit or advance a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    id: BoardId,
    name: BoardName,
    creator: UserEmail,
    members: Vec<UserEmail>,
    columns: ColumnSet,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted board identifier.
    pub id: BoardId,
    /// Persisted board name.
    pub name: BoardName,
    /// Persisted creator.
    pub creator: UserEmail,
    /// Persisted members in join order.
    pub members: Vec<UserEmail>,
    /// Persisted columns with their tasks.
    pub columns: Vec<Column>,
}

impl Board {
    /// Creates a board with the policy's default columns and no members.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] when a policy column
    /// name is empty.
    pub fn new(
        creator: UserEmail,
        name: BoardName,
        policy: &BoardPolicy,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            id: BoardId::new(),
            name,
            creator,
            members: Vec::new(),
            columns: ColumnSet::with_names(policy.default_columns())?,
        })
    }

    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            creator: data.creator,
            members: data.members,
            columns: ColumnSet::from_persisted(data.columns),
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board name.
    #[must_use]
    pub const fn name(&self) -> &BoardName {
        &self.name
    }

    /// Returns the creator.
    #[must_use]
    pub const fn creator(&self) -> &UserEmail {
        &self.creator
    }

    /// Returns the registry key.
    #[must_use]
    pub fn key(&self) -> BoardKey {
        BoardKey::new(self.creator.clone(), self.name.clone())
    }

    /// Returns the members in join order.
    #[must_use]
    pub fn members(&self) -> &[UserEmail] {
        &self.members
    }

    /// Returns the columns.
    #[must_use]
    pub const fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Adds a member. Duplicate checks belong to the caller.
    pub fn join(&mut self, email: UserEmail) {
        self.members.push(email);
    }

    /// Returns `true` when `email` is a member.
    #[must_use]
    pub fn is_member(&self, email: &UserEmail) -> bool {
        self.members.contains(email)
    }

    /// Returns `true` when `email` is the creator or a member.
    #[must_use]
    pub fn is_accessible_by(&self, email: &UserEmail) -> bool {
        self.creator == *email || self.is_member(email)
    }

    /// Finds a task anywhere on the board, with its column ordinal.
    #[must_use]
    pub fn find_task(&self, id: TaskId) -> Option<(usize, &Task)> {
        let ordinal = self.columns.locate_task(id)?;
        let task = self.columns.column(ordinal).ok()?.task(id).ok()?;
        Some((ordinal, task))
    }

    /// Creates a task in the backlog.
    ///
    /// # Errors
    ///
    /// Returns a validation error for the draft or
    /// [`BoardDomainError::LimitReached`] when the backlog is full.
    pub fn add_task(
        &mut self,
        draft: TaskDraft,
        limits: TaskLimits,
        clock: &impl Clock,
    ) -> Result<&Task, BoardDomainError> {
        let backlog = self.columns.column_mut(0)?;
        let task = Task::new(backlog.id(), draft, limits, clock)?;
        let id = task.id();
        backlog.add_task(task)?;
        backlog.task(id)
    }

    /// Replaces a task title.
    ///
    /// # Errors
    ///
    /// Fails the editing gates or the title validation.
    pub fn update_task_title(
        &mut self,
        id: TaskId,
        ordinal: usize,
        user: &UserEmail,
        title: impl Into<String>,
        limits: TaskLimits,
    ) -> Result<(), BoardDomainError> {
        self.editable_task_mut(id, ordinal, user)?
            .set_title(title, limits)
    }

    /// Replaces a task description.
    ///
    /// # Errors
    ///
    /// Fails the editing gates or the description validation.
    pub fn update_task_description(
        &mut self,
        id: TaskId,
        ordinal: usize,
        user: &UserEmail,
        description: impl Into<String>,
        limits: TaskLimits,
    ) -> Result<(), BoardDomainError> {
        self.editable_task_mut(id, ordinal, user)?
            .set_description(description, limits)
    }

    /// Replaces a task due date.
    ///
    /// # Errors
    ///
    /// Fails the editing gates or [`BoardDomainError::DueInPast`].
    pub fn update_task_due(
        &mut self,
        id: TaskId,
        ordinal: usize,
        user: &UserEmail,
        due: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.editable_task_mut(id, ordinal, user)?.set_due(due, clock)
    }

    /// Moves a task from `ordinal` to the next column.
    ///
    /// The target capacity is checked before the task leaves its source, so
    /// a full target leaves the board untouched.
    ///
    /// # Errors
    ///
    /// Fails the editing gates or returns
    /// [`BoardDomainError::LimitReached`] when the next column is full.
    pub fn advance_task(
        &mut self,
        id: TaskId,
        ordinal: usize,
        user: &UserEmail,
    ) -> Result<(), BoardDomainError> {
        self.editable_task_mut(id, ordinal, user)?;
        let next = ordinal + 1;
        self.columns.column(next)?.ensure_capacity_for(1)?;

        let task = self.columns.column_mut(ordinal)?.remove_task(id)?;
        self.columns.column_mut(next)?.add_task(task)
    }

    /// Reassigns a task to another board member.
    ///
    /// The acting user does not need to be the current assignee.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnLocked`],
    /// [`BoardDomainError::NotMember`] when `assignee` has not joined, or
    /// [`BoardDomainError::TaskNotFound`], in that order.
    pub fn assign_task(
        &mut self,
        id: TaskId,
        ordinal: usize,
        assignee: UserEmail,
    ) -> Result<(), BoardDomainError> {
        self.ensure_changeable(ordinal)?;
        if !self.is_member(&assignee) {
            return Err(BoardDomainError::NotMember(assignee));
        }
        self.columns
            .column_mut(ordinal)?
            .task_mut(id)?
            .set_assignee(assignee);
        Ok(())
    }

    /// Returns tasks assigned to `email` in the in-progress columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotMember`] when `email` has not joined.
    pub fn in_progress_tasks(&self, email: &UserEmail) -> Result<Vec<&Task>, BoardDomainError> {
        if !self.is_member(email) {
            return Err(BoardDomainError::NotMember(email.clone()));
        }
        Ok(self.columns.assignee_tasks(email))
    }

    /// Inserts a column.
    ///
    /// # Errors
    ///
    /// See [`ColumnSet::add_column`].
    pub fn add_column(
        &mut self,
        ordinal: usize,
        name: impl Into<String>,
    ) -> Result<(), BoardDomainError> {
        self.columns.add_column(ordinal, name)
    }

    /// Renames a column.
    ///
    /// # Errors
    ///
    /// See [`ColumnSet::rename_column`].
    pub fn rename_column(
        &mut self,
        ordinal: usize,
        name: impl Into<String>,
    ) -> Result<(), BoardDomainError> {
        self.columns.rename_column(ordinal, name)
    }

    /// Moves an empty column.
    ///
    /// # Errors
    ///
    /// See [`ColumnSet::move_column`].
    pub fn move_column(&mut self, ordinal: usize, shift: isize) -> Result<(), BoardDomainError> {
        self.columns.move_column(ordinal, shift)
    }

    /// Removes a column, merging its tasks into a neighbour.
    ///
    /// # Errors
    ///
    /// See [`ColumnSet::remove_column`].
    pub fn remove_column(&mut self, ordinal: usize) -> Result<(), BoardDomainError> {
        self.columns.remove_column(ordinal)
    }

    /// Sets a column limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] or
    /// [`BoardDomainError::InvalidLimit`].
    pub fn limit_column(&mut self, ordinal: usize, limit: usize) -> Result<(), BoardDomainError> {
        self.columns.column_mut(ordinal)?.set_limit(limit)
    }

    /// Clears a column limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`].
    pub fn remove_column_limit(&mut self, ordinal: usize) -> Result<(), BoardDomainError> {
        self.columns.column_mut(ordinal)?.remove_limit();
        Ok(())
    }

    /// Returns a column limit, `None` when unlimited.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`].
    pub fn column_limit(&self, ordinal: usize) -> Result<Option<usize>, BoardDomainError> {
        Ok(self.columns.column(ordinal)?.limit())
    }

    fn ensure_changeable(&self, ordinal: usize) -> Result<(), BoardDomainError> {
        if ordinal >= self.columns.done_ordinal() {
            return Err(BoardDomainError::ColumnLocked(ordinal));
        }
        Ok(())
    }

    fn editable_task_mut(
        &mut self,
        id: TaskId,
        ordinal: usize,
        user: &UserEmail,
    ) -> Result<&mut Task, BoardDomainError> {
        self.ensure_changeable(ordinal)?;
        let task = self.columns.column_mut(ordinal)?.task_mut(id)?;
        if task.assignee() != user {
            return Err(BoardDomainError::NotAssignee {
                task: id,
                user: user.clone(),
            });
        }
        Ok(task)
    }
}
