//! In-memory integration tests for sessions, membership, and reloading.

use kanban::board::adapters::memory::InMemoryBoardRepository;
use kanban::error::ErrorKind;
use kanban::user::adapters::memory::InMemoryUserRepository;
use rstest::rstest;

use super::helpers::{
    PASSWORD, TestFacade, add_task, board_key, create_board, expect_kind, facade, facade_over,
    sign_in, value,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_read_a_board(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let bob = sign_in(&facade, "bob@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;

    expect_kind(&facade.columns(&bob, &roadmap).await, ErrorKind::Unauthorized)?;
    eyre::ensure!(
        value(facade.boards(&bob).await)?.is_empty(),
        "bob should see no boards"
    );

    value(facade.join_board(&bob, &roadmap).await)?;
    let visible = value(facade.board_names(&bob).await)?;
    eyre::ensure!(visible == [roadmap.clone()], "bob should see the roadmap");
    expect_kind(
        &facade.join_board(&bob, &roadmap).await,
        ErrorKind::AlreadyExists,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_name_is_allowed_for_different_creators(
    mut facade: TestFacade,
) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let bob = sign_in(&facade, "bob@example.com").await?;

    create_board(&mut facade, &alice, "Roadmap").await?;
    create_board(&mut facade, &bob, "Roadmap").await?;

    expect_kind(
        &facade.add_board(&alice, "Roadmap").await,
        ErrorKind::AlreadyExists,
    )?;
    expect_kind(&facade.add_board(&alice, "  ").await, ErrorKind::Validation)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassigned_task_follows_its_new_owner(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let bob = sign_in(&facade, "bob@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;
    let task = add_task(&mut facade, &alice, &roadmap, "Hand over").await?;

    let early = facade
        .assign_task(&alice, &roadmap, task.id, 0, "bob@example.com")
        .await;
    expect_kind(&early, ErrorKind::Unauthorized)?;

    value(facade.join_board(&bob, &roadmap).await)?;
    value(
        facade
            .assign_task(&alice, &roadmap, task.id, 0, "bob@example.com")
            .await,
    )?;

    let denied = facade.advance_task(&alice, &roadmap, task.id, 0).await;
    expect_kind(&denied, ErrorKind::Unauthorized)?;
    value(facade.advance_task(&bob, &roadmap, task.id, 0).await)?;

    let bobs = value(facade.in_progress_tasks(&bob).await)?;
    eyre::ensure!(bobs.len() == 1, "bob should own one task in progress");
    eyre::ensure!(
        value(facade.in_progress_tasks(&alice).await)?.is_empty(),
        "alice no longer owns the task"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_cannot_remove_the_board(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let bob = sign_in(&facade, "bob@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;
    value(facade.join_board(&bob, &roadmap).await)?;

    expect_kind(
        &facade.remove_board(&bob, &roadmap).await,
        ErrorKind::Unauthorized,
    )?;
    eyre::ensure!(
        value(facade.board_names(&alice).await)?.len() == 1,
        "board should survive"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn logged_out_sessions_are_refused(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    let roadmap = create_board(&mut facade, &alice, "Roadmap").await?;

    value(facade.logout(&alice))?;

    expect_kind(&facade.columns(&alice, &roadmap).await, ErrorKind::Unauthorized)?;
    expect_kind(&facade.logout(&alice), ErrorKind::InvalidState)?;
    let again = value(facade.login("alice@example.com", PASSWORD).await)?;
    value(facade.columns(&again, &roadmap).await)?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reload_restores_users_and_boards() -> Result<(), eyre::Report> {
    let boards = InMemoryBoardRepository::new();
    let users = InMemoryUserRepository::new();
    let mut first = facade_over(boards.clone(), users.clone());
    let alice = sign_in(&first, "alice@example.com").await?;
    let roadmap = create_board(&mut first, &alice, "Roadmap").await?;
    add_task(&mut first, &alice, &roadmap, "Persisted").await?;

    let mut second = facade_over(boards, users);
    let summary = value(second.load_data().await)?;
    eyre::ensure!(summary.users == 1, "one user should be loaded");
    eyre::ensure!(summary.boards == 1, "one board should be loaded");

    expect_kind(&second.columns(&alice, &roadmap).await, ErrorKind::Unauthorized)?;
    let session = value(second.login("alice@example.com", PASSWORD).await)?;
    let reloaded = board_key("alice@example.com", "Roadmap")?;
    let backlog = value(second.column_tasks(&session, &reloaded, 0).await)?;
    eyre::ensure!(
        backlog.iter().any(|task| task.title == "Persisted"),
        "stored task should be reloaded"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_data_wipes_everything(mut facade: TestFacade) -> Result<(), eyre::Report> {
    let alice = sign_in(&facade, "alice@example.com").await?;
    create_board(&mut facade, &alice, "Roadmap").await?;

    value(facade.delete_data().await)?;

    let summary = value(facade.load_data().await)?;
    eyre::ensure!(summary.users == 0, "users should be wiped");
    eyre::ensure!(summary.boards == 0, "boards should be wiped");
    expect_kind(
        &facade.login("alice@example.com", PASSWORD).await,
        ErrorKind::NotFound,
    )
}
