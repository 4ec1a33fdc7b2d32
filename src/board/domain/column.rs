//! Column entity: an ordered bag of tasks with an optional work limit.

use super::{BoardDomainError, ColumnId, Task, TaskId};
use crate::user::domain::UserEmail;

/// A board column.
///
/// Tasks keep insertion order and are unique by id. When a limit is set the
/// task count never exceeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    id: ColumnId,
    name: String,
    ordinal: usize,
    limit: Option<usize>,
    tasks: Vec<Task>,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Persisted name.
    pub name: String,
    /// Persisted position.
    pub ordinal: usize,
    /// Persisted limit, `None` when unlimited.
    pub limit: Option<usize>,
    /// Tasks held by the column in insertion order.
    pub tasks: Vec<Task>,
}

impl Column {
    /// Creates an empty, unlimited column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] when the name is empty.
    pub fn new(name: impl Into<String>, ordinal: usize) -> Result<Self, BoardDomainError> {
        Ok(Self {
            id: ColumnId::new(),
            name: validate_name(name.into())?,
            ordinal,
            limit: None,
            tasks: Vec::new(),
        })
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            ordinal: data.ordinal,
            limit: data.limit,
            tasks: data.tasks,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column position.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub(crate) const fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = ordinal;
    }

    /// Returns the limit, or `None` when the column is unlimited.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the column holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns `true` when `additional` more tasks fit under the limit.
    #[must_use]
    pub fn has_capacity_for(&self, additional: usize) -> bool {
        self.limit
            .is_none_or(|limit| self.len().saturating_add(additional) <= limit)
    }

    /// Returns `true` when the column holds the task.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id() == id)
    }

    /// Returns the task with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TaskNotFound`] when absent.
    pub fn task(&self, id: TaskId) -> Result<&Task, BoardDomainError> {
        self.tasks
            .iter()
            .find(|task| task.id() == id)
            .ok_or(BoardDomainError::TaskNotFound(id))
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, BoardDomainError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(BoardDomainError::TaskNotFound(id))
    }

    /// Returns the tasks assigned to `email`.
    pub fn assignee_tasks<'a>(&'a self, email: &UserEmail) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |task| task.assignee() == email)
    }

    /// Inserts a task and points it at this column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateTask`] when the id is already
    /// present or [`BoardDomainError::LimitReached`] when the column is full.
    pub fn add_task(&mut self, mut task: Task) -> Result<(), BoardDomainError> {
        if self.contains(task.id()) {
            return Err(BoardDomainError::DuplicateTask(task.id()));
        }
        self.ensure_capacity_for(1)?;
        task.move_column(self.id);
        self.tasks.push(task);
        Ok(())
    }

    /// Removes a task and hands ownership to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TaskNotFound`] when absent.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task, BoardDomainError> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(BoardDomainError::TaskNotFound(id))?;
        Ok(self.tasks.remove(position))
    }

    /// Sets the work limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidLimit`] when `limit` is zero or
    /// below the current task count.
    pub fn set_limit(&mut self, limit: usize) -> Result<(), BoardDomainError> {
        let count = self.len();
        if limit == 0 || limit < count {
            return Err(BoardDomainError::InvalidLimit { limit, count });
        }
        self.limit = Some(limit);
        Ok(())
    }

    /// Clears the work limit. Clearing an unlimited column is a no-op.
    pub const fn remove_limit(&mut self) {
        self.limit = None;
    }

    /// Moves every task of `other` into this column, leaving `other` empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::LimitReached`] when the combined count
    /// exceeds this column's limit; nothing is moved in that case.
    pub fn consume(&mut self, other: &mut Self) -> Result<(), BoardDomainError> {
        self.ensure_capacity_for(other.len())?;
        for mut task in other.tasks.drain(..) {
            task.move_column(self.id);
            self.tasks.push(task);
        }
        Ok(())
    }

    /// Renames the column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] when the name is empty.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), BoardDomainError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    pub(crate) fn ensure_capacity_for(&self, additional: usize) -> Result<(), BoardDomainError> {
        match self.limit {
            Some(limit) if !self.has_capacity_for(additional) => {
                Err(BoardDomainError::LimitReached {
                    column: self.name.clone(),
                    limit,
                })
            }
            _ => Ok(()),
        }
    }
}

fn validate_name(name: String) -> Result<String, BoardDomainError> {
    if name.is_empty() {
        return Err(BoardDomainError::EmptyColumnName);
    }
    Ok(name)
}
