//! Diesel row models for board persistence.
//!
//! Each model serves both as the query result and the insert shape, since
//! board aggregates are always rewritten in full.

use super::schema::{board_columns, board_members, boards, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Board header row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Board identifier.
    pub id: Uuid,
    /// Board name.
    pub name: String,
    /// Creator email.
    pub creator: String,
}

/// Membership row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MemberRow {
    /// Owning board.
    pub board_id: Uuid,
    /// Join order.
    pub position: i32,
    /// Member email.
    pub email: String,
}

/// Column row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: Uuid,
    /// Owning board.
    pub board_id: Uuid,
    /// Column name.
    pub name: String,
    /// Position within the board.
    pub ordinal: i32,
    /// Work limit, `None` when unlimited.
    pub task_limit: Option<i32>,
}

/// Task row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning board.
    pub board_id: Uuid,
    /// Column holding the task.
    pub column_id: Uuid,
    /// Insertion order within the column.
    pub position: i32,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Assignee email.
    pub assignee: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Due date.
    pub due: DateTime<Utc>,
}
