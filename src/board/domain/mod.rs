//! Domain model for Kanban boards.
//!
//! A [`Board`] owns an ordered [`ColumnSet`]; each [`Column`] owns its
//! [`Task`]s and tasks refer back to their column by [`ColumnId`]. All
//! invariants (work limits, ordinal contiguity, the done-column freeze,
//! assignee checks) are enforced here, independent of persistence.

mod board;
mod column;
mod column_set;
mod error;
mod ids;
mod policy;
mod task;

pub use board::{Board, PersistedBoardData};
pub use column::{Column, PersistedColumnData};
pub use column_set::{ColumnSet, MIN_COLUMNS};
pub use error::BoardDomainError;
pub use ids::{BoardId, BoardKey, BoardName, ColumnId, TaskId};
pub use policy::{BoardPolicy, TaskLimits};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskView};
