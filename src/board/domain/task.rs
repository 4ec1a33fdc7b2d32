//! Task entity and its boundary view.

use super::{BoardDomainError, ColumnId, TaskId, TaskLimits};
use crate::user::domain::UserEmail;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Task description, possibly empty.
    pub description: String,
    /// User responsible for the task.
    pub assignee: UserEmail,
    /// Due date, not earlier than creation time.
    pub due: DateTime<Utc>,
}

/// A unit of work held by exactly one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    column_id: ColumnId,
    created_at: DateTime<Utc>,
    title: String,
    description: String,
    assignee: UserEmail,
    due: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Column holding the task.
    pub column_id: ColumnId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee.
    pub assignee: UserEmail,
    /// Persisted due date.
    pub due: DateTime<Utc>,
}

impl Task {
    /// Creates a validated task in the given column.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the title, description, or due date
    /// is rejected.
    pub fn new(
        column_id: ColumnId,
        draft: TaskDraft,
        limits: TaskLimits,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let now = clock.utc();
        validate_title(&draft.title, limits)?;
        validate_description(&draft.description, limits)?;
        validate_due(draft.due, now)?;

        Ok(Self {
            id: TaskId::new(),
            column_id,
            created_at: now,
            title: draft.title,
            description: draft.description,
            assignee: draft.assignee,
            due: draft.due,
        })
    }

    /// Reconstructs a task from persisted storage without revalidating it.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            column_id: data.column_id,
            created_at: data.created_at,
            title: data.title,
            description: data.description,
            assignee: data.assignee,
            due: data.due,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the identifier of the column holding the task.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &UserEmail {
        &self.assignee
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due(&self) -> DateTime<Utc> {
        self.due
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] or
    /// [`BoardDomainError::TitleTooLong`]; the title is unchanged on error.
    pub fn set_title(
        &mut self,
        title: impl Into<String>,
        limits: TaskLimits,
    ) -> Result<(), BoardDomainError> {
        let value = title.into();
        validate_title(&value, limits)?;
        self.title = value;
        Ok(())
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DescriptionTooLong`]; the description is
    /// unchanged on error.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
        limits: TaskLimits,
    ) -> Result<(), BoardDomainError> {
        let value = description.into();
        validate_description(&value, limits)?;
        self.description = value;
        Ok(())
    }

    /// Replaces the due date.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DueInPast`] when `due` is earlier than the
    /// clock's current time.
    pub fn set_due(&mut self, due: DateTime<Utc>, clock: &impl Clock) -> Result<(), BoardDomainError> {
        validate_due(due, clock.utc())?;
        self.due = due;
        Ok(())
    }

    /// Replaces the assignee. Membership is checked by the board.
    pub fn set_assignee(&mut self, assignee: UserEmail) {
        self.assignee = assignee;
    }

    /// Points the task at another column. Capacity is the caller's concern.
    pub const fn move_column(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
    }
}

fn validate_title(title: &str, limits: TaskLimits) -> Result<(), BoardDomainError> {
    if title.is_empty() {
        return Err(BoardDomainError::EmptyTitle);
    }
    let actual = title.chars().count();
    if actual > limits.max_title_chars {
        return Err(BoardDomainError::TitleTooLong {
            max: limits.max_title_chars,
            actual,
        });
    }
    Ok(())
}

fn validate_description(description: &str, limits: TaskLimits) -> Result<(), BoardDomainError> {
    let actual = description.chars().count();
    if actual > limits.max_description_chars {
        return Err(BoardDomainError::DescriptionTooLong {
            max: limits.max_description_chars,
            actual,
        });
    }
    Ok(())
}

fn validate_due(due: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), BoardDomainError> {
    if due < now {
        return Err(BoardDomainError::DueInPast { due, now });
    }
    Ok(())
}

/// Serializable snapshot of a task returned across the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Column holding the task.
    pub column_id: ColumnId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Assignee.
    pub assignee: UserEmail,
    /// Due date.
    pub due: DateTime<Utc>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            column_id: task.column_id,
            created_at: task.created_at,
            title: task.title.clone(),
            description: task.description.clone(),
            assignee: task.assignee.clone(),
            due: task.due,
        }
    }
}
