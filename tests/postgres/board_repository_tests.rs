//! `PostgreSQL` tests for board aggregate persistence.

use chrono::Duration;
use kanban::board::domain::{BoardId, TaskLimits};
use kanban::board::ports::{BoardRepository, BoardRepositoryError};
use mockable::DefaultClock;
use rstest::rstest;

use crate::postgres::helpers::{
    BoxError, PgContext, draft, email, layout, pg_context, seeded_board,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_board_is_rebuilt_in_order(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let board = seeded_board("Roadmap")?;

    context.boards.store(&board).await?;
    let found = context.boards.find_all().await?;

    assert_eq!(found.len(), 1);
    let reloaded = found.first().ok_or("board should be reloaded")?;
    assert_eq!(reloaded.id(), board.id());
    assert_eq!(reloaded.key(), board.key());
    assert_eq!(layout(reloaded), layout(&board));
    assert_eq!(
        layout(reloaded).1,
        vec![
            ("backlog".to_owned(), None, vec!["Third".to_owned()]),
            (
                "in progress".to_owned(),
                Some(3),
                vec!["First".to_owned(), "Second".to_owned()]
            ),
            ("review".to_owned(), None, Vec::new()),
            ("done".to_owned(), None, Vec::new()),
        ]
    );
    for (original, restored) in board.columns().iter().zip(reloaded.columns().iter()) {
        assert_eq!(restored.id(), original.id());
        for (task, copy) in original.tasks().iter().zip(restored.tasks()) {
            assert_eq!(copy.id(), task.id());
            assert_eq!(copy.column_id(), restored.id());
            assert_eq!(copy.description(), task.description());
            assert_eq!(copy.assignee(), task.assignee());
            assert!((copy.due() - task.due()).abs() < Duration::milliseconds(1));
        }
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_columns_tasks_and_members(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let mut board = seeded_board("Roadmap")?;
    context.boards.store(&board).await?;
    let alice = email("alice@example.com")?;
    let carol = email("carol@example.com")?;

    board.remove_column_limit(1)?;
    board.limit_column(0, 2)?;
    board.rename_column(3, "shipped")?;
    board.move_column(2, -2)?;
    board.join(carol.clone());
    board.add_task(draft("Fourth", &carol), TaskLimits::default(), &DefaultClock)?;
    let first = board
        .columns()
        .column(2)?
        .tasks()
        .first()
        .map(|task| task.id())
        .ok_or("in-progress column should hold tasks")?;
    board.advance_task(first, 2, &alice)?;
    context.boards.update(&board).await?;

    let found = context.boards.find_all().await?;
    let reloaded = found.first().ok_or("board should be reloaded")?;
    assert_eq!(layout(reloaded), layout(&board));
    assert_eq!(
        reloaded.members().last().map(|member| member.as_str()),
        Some("carol@example.com")
    );
    let names: Vec<&str> = reloaded.columns().iter().map(|column| column.name()).collect();
    assert_eq!(names, vec!["review", "backlog", "in progress", "shipped"]);
    assert_eq!(reloaded.column_limit(1)?, Some(2));
    assert_eq!(reloaded.column_limit(2)?, None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_board_is_not_found(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let board = seeded_board("Ghost")?;
    let missing = BoardId::new();

    let updated = context.boards.update(&board).await;
    let deleted = context.boards.delete(missing).await;

    assert!(matches!(updated, Err(BoardRepositoryError::NotFound(id)) if id == board.id()));
    assert!(matches!(deleted, Err(BoardRepositoryError::NotFound(id)) if id == missing));
    assert!(context.boards.find_all().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_twice_is_a_duplicate(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let board = seeded_board("Roadmap")?;
    context.boards.store(&board).await?;

    let again = context.boards.store(&board).await;

    assert!(matches!(again, Err(BoardRepositoryError::DuplicateBoard(id)) if id == board.id()));
    assert_eq!(context.boards.find_all().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_one_board_and_delete_all_the_rest(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let roadmap = seeded_board("Roadmap")?;
    let backlog = seeded_board("Backlog")?;
    let chores = seeded_board("Chores")?;
    for board in [&roadmap, &backlog, &chores] {
        context.boards.store(board).await?;
    }

    context.boards.delete(roadmap.id()).await?;
    let remaining = context.boards.find_all().await?;
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|board| board.id() != roadmap.id()));

    context.boards.delete_all().await?;
    assert!(context.boards.find_all().await?.is_empty());
    Ok(())
}
