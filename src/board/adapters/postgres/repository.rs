//! `PostgreSQL` repository implementation for board aggregates.
//!
//! A board is spread across four tables. Every write replaces the full
//! aggregate inside one transaction so readers never observe a board whose
//! columns and tasks disagree.

use super::{
    models::{BoardRow, ColumnRow, MemberRow, TaskRow},
    schema::{board_columns, board_members, boards, tasks},
};
use crate::board::{
    domain::{
        Board, BoardId, BoardName, Column, ColumnId, PersistedBoardData, PersistedColumnData,
        PersistedTaskData, Task, TaskId,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use crate::user::domain::UserEmail;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let rows = BoardRows::from_board(board)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                diesel::insert_into(boards::table)
                    .values(&rows.board)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            BoardRepositoryError::DuplicateBoard(board_id)
                        }
                        _ => BoardRepositoryError::persistence(err),
                    })?;
                rows.insert_children(tx)
            })
        })
        .await
    }

    async fn update(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let rows = BoardRows::from_board(board)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                let updated = diesel::update(boards::table.find(board_id.into_inner()))
                    .set((
                        boards::name.eq(&rows.board.name),
                        boards::creator.eq(&rows.board.creator),
                    ))
                    .execute(tx)?;
                if updated == 0 {
                    return Err(BoardRepositoryError::NotFound(board_id));
                }
                delete_children(tx, board_id.into_inner())?;
                rows.insert_children(tx)
            })
        })
        .await
    }

    async fn delete(&self, id: BoardId) -> BoardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                delete_children(tx, id.into_inner())?;
                let deleted = diesel::delete(boards::table.find(id.into_inner())).execute(tx)?;
                if deleted == 0 {
                    return Err(BoardRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_all(&self) -> BoardRepositoryResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                let board_rows = boards::table
                    .select(BoardRow::as_select())
                    .load::<BoardRow>(tx)?;
                let member_rows = board_members::table
                    .order((board_members::board_id, board_members::position))
                    .select(MemberRow::as_select())
                    .load::<MemberRow>(tx)?;
                let column_rows = board_columns::table
                    .order((board_columns::board_id, board_columns::ordinal))
                    .select(ColumnRow::as_select())
                    .load::<ColumnRow>(tx)?;
                let task_rows = tasks::table
                    .order((tasks::column_id, tasks::position))
                    .select(TaskRow::as_select())
                    .load::<TaskRow>(tx)?;
                assemble(board_rows, member_rows, column_rows, task_rows)
            })
        })
        .await
    }

    async fn delete_all(&self) -> BoardRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                diesel::delete(tasks::table).execute(tx)?;
                diesel::delete(board_columns::table).execute(tx)?;
                diesel::delete(board_members::table).execute(tx)?;
                diesel::delete(boards::table).execute(tx)?;
                Ok(())
            })
        })
        .await
    }
}

/// Flattened rows for one board aggregate.
struct BoardRows {
    board: BoardRow,
    members: Vec<MemberRow>,
    columns: Vec<ColumnRow>,
    tasks: Vec<TaskRow>,
}

impl BoardRows {
    fn from_board(board: &Board) -> BoardRepositoryResult<Self> {
        let board_id = board.id().into_inner();
        let members = board
            .members()
            .iter()
            .enumerate()
            .map(|(position, email)| {
                Ok(MemberRow {
                    board_id,
                    position: to_i32(position)?,
                    email: email.as_str().to_owned(),
                })
            })
            .collect::<BoardRepositoryResult<Vec<_>>>()?;

        let mut columns = Vec::with_capacity(board.columns().len());
        let mut task_rows = Vec::new();
        for column in board.columns() {
            columns.push(ColumnRow {
                id: column.id().into_inner(),
                board_id,
                name: column.name().to_owned(),
                ordinal: to_i32(column.ordinal())?,
                task_limit: column.limit().map(to_i32).transpose()?,
            });
            for (position, task) in column.tasks().iter().enumerate() {
                task_rows.push(TaskRow {
                    id: task.id().into_inner(),
                    board_id,
                    column_id: column.id().into_inner(),
                    position: to_i32(position)?,
                    title: task.title().to_owned(),
                    description: task.description().to_owned(),
                    assignee: task.assignee().as_str().to_owned(),
                    created_at: task.created_at(),
                    due: task.due(),
                });
            }
        }

        Ok(Self {
            board: BoardRow {
                id: board_id,
                name: board.name().as_str().to_owned(),
                creator: board.creator().as_str().to_owned(),
            },
            members,
            columns,
            tasks: task_rows,
        })
    }

    fn insert_children(&self, connection: &mut PgConnection) -> BoardRepositoryResult<()> {
        diesel::insert_into(board_members::table)
            .values(&self.members)
            .execute(connection)?;
        diesel::insert_into(board_columns::table)
            .values(&self.columns)
            .execute(connection)?;
        diesel::insert_into(tasks::table)
            .values(&self.tasks)
            .execute(connection)?;
        Ok(())
    }
}

fn delete_children(connection: &mut PgConnection, board_id: Uuid) -> BoardRepositoryResult<()> {
    diesel::delete(tasks::table.filter(tasks::board_id.eq(board_id))).execute(connection)?;
    diesel::delete(board_columns::table.filter(board_columns::board_id.eq(board_id)))
        .execute(connection)?;
    diesel::delete(board_members::table.filter(board_members::board_id.eq(board_id)))
        .execute(connection)?;
    Ok(())
}

fn assemble(
    board_rows: Vec<BoardRow>,
    member_rows: Vec<MemberRow>,
    column_rows: Vec<ColumnRow>,
    task_rows: Vec<TaskRow>,
) -> BoardRepositoryResult<Vec<Board>> {
    let mut members: HashMap<Uuid, Vec<UserEmail>> = HashMap::new();
    for row in member_rows {
        members
            .entry(row.board_id)
            .or_default()
            .push(parse_email(row.email)?);
    }

    let mut tasks_by_column: HashMap<Uuid, Vec<Task>> = HashMap::new();
    for row in task_rows {
        tasks_by_column
            .entry(row.column_id)
            .or_default()
            .push(row_to_task(row)?);
    }

    let mut columns: HashMap<Uuid, Vec<Column>> = HashMap::new();
    for row in column_rows {
        let column_tasks = tasks_by_column.remove(&row.id).unwrap_or_default();
        columns
            .entry(row.board_id)
            .or_default()
            .push(row_to_column(row, column_tasks)?);
    }

    board_rows
        .into_iter()
        .map(|row| {
            let board_members = members.remove(&row.id).unwrap_or_default();
            let board_columns = columns.remove(&row.id).unwrap_or_default();
            Ok(Board::from_persisted(PersistedBoardData {
                id: BoardId::from_uuid(row.id),
                name: BoardName::new(row.name).map_err(BoardRepositoryError::persistence)?,
                creator: parse_email(row.creator)?,
                members: board_members,
                columns: board_columns,
            }))
        })
        .collect()
}

fn row_to_column(row: ColumnRow, column_tasks: Vec<Task>) -> BoardRepositoryResult<Column> {
    Ok(Column::from_persisted(PersistedColumnData {
        id: ColumnId::from_uuid(row.id),
        name: row.name,
        ordinal: to_usize(row.ordinal)?,
        limit: row.task_limit.map(to_usize).transpose()?,
        tasks: column_tasks,
    }))
}

fn row_to_task(row: TaskRow) -> BoardRepositoryResult<Task> {
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        column_id: ColumnId::from_uuid(row.column_id),
        created_at: row.created_at,
        title: row.title,
        description: row.description,
        assignee: parse_email(row.assignee)?,
        due: row.due,
    }))
}

fn parse_email(value: String) -> BoardRepositoryResult<UserEmail> {
    UserEmail::new(value).map_err(BoardRepositoryError::persistence)
}

fn to_i32(value: usize) -> BoardRepositoryResult<i32> {
    i32::try_from(value).map_err(BoardRepositoryError::persistence)
}

fn to_usize(value: i32) -> BoardRepositoryResult<usize> {
    usize::try_from(value).map_err(BoardRepositoryError::persistence)
}
