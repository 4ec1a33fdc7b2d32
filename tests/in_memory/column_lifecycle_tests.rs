//! In-memory integration tests for column layout changes and work limits.

use super::helpers::{
    TestFacade, add_task, create_board, expect_kind, facade, sign_in, tomorrow, value,
};
use kanban::board::services::ColumnView;
use kanban::error::ErrorKind;
use rstest::rstest;

fn names(columns: &[ColumnView]) -> Vec<&str> {
    columns.iter().map(|column| column.name.as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn columns_are_added_renamed_and_moved(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;

    value(facade.add_column(&alice, &roadmap, 2, "review").await)?;
    value(facade.rename_column(&alice, &roadmap, 1, "doing").await)?;
    value(facade.move_column(&alice, &roadmap, 2, -1).await)?;

    let columns = value(facade.columns(&alice, &roadmap).await)?;
    eyre::ensure!(
        names(&columns) == ["backlog", "review", "doing", "done"],
        "unexpected layout {:?}",
        names(&columns)
    );
    eyre::ensure!(
        columns
            .iter()
            .enumerate()
            .all(|(position, column)| column.ordinal == position),
        "ordinals should match positions"
    );
    let name = value(facade.column_name(&alice, &roadmap, 1).await)?;
    eyre::ensure!(name == "review", "column 1 should be review");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_layout_errors_are_classified(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;
    add_task(&mut facade, &alice, &roadmap, "Occupant").await?;

    expect_kind(
        &facade.add_column(&alice, &roadmap, 9, "far").await,
        ErrorKind::InvalidArgument,
    )?;
    expect_kind(
        &facade.move_column(&alice, &roadmap, 0, 1).await,
        ErrorKind::InvalidArgument,
    )?;
    expect_kind(
        &facade.move_column(&alice, &roadmap, 1, 0).await,
        ErrorKind::InvalidArgument,
    )?;
    expect_kind(
        &facade.rename_column(&alice, &roadmap, 7, "ghost").await,
        ErrorKind::NotFound,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_the_backlog_merges_forward(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;
    add_task(&mut facade, &alice, &roadmap, "First").await?;
    add_task(&mut facade, &alice, &roadmap, "Second").await?;
    let moving = add_task(&mut facade, &alice, &roadmap, "Third").await?;
    value(facade.advance_task(&alice, &roadmap, moving.id, 0).await)?;

    value(facade.remove_column(&alice, &roadmap, 0).await)?;

    let columns = value(facade.columns(&alice, &roadmap).await)?;
    eyre::ensure!(
        names(&columns) == ["in progress", "done"],
        "unexpected layout {:?}",
        names(&columns)
    );
    let backlog = columns
        .first()
        .ok_or_else(|| eyre::eyre!("board should keep a backlog"))?;
    eyre::ensure!(backlog.tasks.len() == 3, "all tasks should be merged");
    eyre::ensure!(
        backlog.tasks.iter().all(|task| task.column_id == backlog.id),
        "merged tasks should point at the new backlog"
    );

    expect_kind(
        &facade.remove_column(&alice, &roadmap, 0).await,
        ErrorKind::InvalidArgument,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_limits_cap_new_tasks(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;

    eyre::ensure!(
        value(facade.column_limit(&alice, &roadmap, 0).await)?.is_none(),
        "columns start unlimited"
    );
    value(facade.limit_column(&alice, &roadmap, 0, 1).await)?;
    add_task(&mut facade, &alice, &roadmap, "Only one").await?;

    let overflow = facade
        .add_task(&alice, &roadmap, "One too many", "", tomorrow())
        .await;
    expect_kind(&overflow, ErrorKind::LimitReached)?;
    eyre::ensure!(
        value(facade.column_limit(&alice, &roadmap, 0).await)? == Some(1),
        "limit should be reported"
    );

    value(facade.remove_column_limit(&alice, &roadmap, 0).await)?;
    value(facade.remove_column_limit(&alice, &roadmap, 0).await)?;
    add_task(&mut facade, &alice, &roadmap, "Room again").await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn limits_below_task_count_are_rejected(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;
    add_task(&mut facade, &alice, &roadmap, "One").await?;
    add_task(&mut facade, &alice, &roadmap, "Two").await?;

    expect_kind(
        &facade.limit_column(&alice, &roadmap, 0, 1).await,
        ErrorKind::InvalidArgument,
    )?;
    expect_kind(
        &facade.limit_column(&alice, &roadmap, 0, 0).await,
        ErrorKind::InvalidArgument,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_target_column_blocks_advance(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;
    let first = add_task(&mut facade, &alice, &roadmap, "First").await?;
    let second = add_task(&mut facade, &alice, &roadmap, "Second").await?;
    value(facade.limit_column(&alice, &roadmap, 1, 1).await)?;
    value(facade.advance_task(&alice, &roadmap, first.id, 0).await)?;

    let blocked = facade.advance_task(&alice, &roadmap, second.id, 0).await;

    expect_kind(&blocked, ErrorKind::LimitReached)?;
    let column = value(facade.task_column(&alice, second.id).await)?;
    eyre::ensure!(column.ordinal == 0, "blocked task should stay in the backlog");
    Ok(())
}
