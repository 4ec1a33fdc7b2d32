//! Error types for board, column, and task invariants.

use super::TaskId;
use crate::error::ErrorKind;
use crate::user::domain::UserEmail;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while validating or mutating board aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the configured length.
    #[error("task title must be at most {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// The task description exceeds the configured length.
    #[error("task description must be at most {max} characters, got {actual}")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected description.
        actual: usize,
    },

    /// The due date lies in the past.
    #[error("due date {due} is earlier than {now}")]
    DueInPast {
        /// Rejected due date.
        due: DateTime<Utc>,
        /// Clock reading at validation time.
        now: DateTime<Utc>,
    },

    /// The board name is empty after trimming.
    #[error("board name must not be empty")]
    EmptyBoardName,

    /// The column name is empty.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// The task is already held by the column.
    #[error("task {0} is already in the column")]
    DuplicateTask(TaskId),

    /// The task is not held by the column.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No column exists at the ordinal.
    #[error("no column at ordinal {0}")]
    ColumnNotFound(usize),

    /// Adding tasks would exceed the column limit.
    #[error("column '{column}' reached its limit of {limit} tasks")]
    LimitReached {
        /// Name of the full column.
        column: String,
        /// Configured limit.
        limit: usize,
    },

    /// The limit is zero or below the current task count.
    #[error("limit {limit} is invalid for a column holding {count} tasks")]
    InvalidLimit {
        /// Rejected limit.
        limit: usize,
        /// Current task count.
        count: usize,
    },

    /// The insertion ordinal lies beyond the end of the column set.
    #[error("cannot insert a column at ordinal {ordinal}, the board has {count} columns")]
    InsertOutOfRange {
        /// Rejected ordinal.
        ordinal: usize,
        /// Current column count.
        count: usize,
    },

    /// A column move by zero positions.
    #[error("column shift must not be zero")]
    ZeroShift,

    /// The move target lies outside the column set.
    #[error("cannot move column {ordinal} by {shift}")]
    ShiftOutOfRange {
        /// Source ordinal.
        ordinal: usize,
        /// Requested shift.
        shift: isize,
    },

    /// Only empty columns may be moved.
    #[error("column {0} still holds tasks")]
    ColumnNotEmpty(usize),

    /// Removing another column would drop below the floor.
    #[error("a board must keep at least {0} columns")]
    TooFewColumns(usize),

    /// Tasks in the column can no longer change.
    #[error("tasks in column {0} cannot be changed")]
    ColumnLocked(usize),

    /// The acting user is not the task assignee.
    #[error("user '{user}' is not assigned to task {task}")]
    NotAssignee {
        /// Task being changed.
        task: TaskId,
        /// Acting user.
        user: UserEmail,
    },

    /// The user is not a board member.
    #[error("user '{0}' is not a member of the board")]
    NotMember(UserEmail),
}

impl BoardDomainError {
    /// Returns the boundary classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle
            | Self::TitleTooLong { .. }
            | Self::DescriptionTooLong { .. }
            | Self::DueInPast { .. }
            | Self::EmptyBoardName => ErrorKind::Validation,
            Self::EmptyColumnName
            | Self::DuplicateTask(_)
            | Self::InvalidLimit { .. }
            | Self::InsertOutOfRange { .. }
            | Self::ZeroShift
            | Self::ShiftOutOfRange { .. }
            | Self::ColumnNotEmpty(_)
            | Self::TooFewColumns(_) => ErrorKind::InvalidArgument,
            Self::TaskNotFound(_) | Self::ColumnNotFound(_) => ErrorKind::NotFound,
            Self::LimitReached { .. } => ErrorKind::LimitReached,
            Self::ColumnLocked(_) => ErrorKind::InvalidState,
            Self::NotAssignee { .. } | Self::NotMember(_) => ErrorKind::Unauthorized,
        }
    }
}
