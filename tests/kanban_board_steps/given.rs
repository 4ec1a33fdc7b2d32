//! Given steps for Kanban board BDD scenarios.

use super::world::{KanbanWorld, PASSWORD, run_async, value};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a logged-in user "{email}""#)]
fn logged_in_user(world: &mut KanbanWorld, email: String) -> Result<(), eyre::Report> {
    value(run_async(world.facade.register(&email, PASSWORD))).wrap_err("register user")?;
    let session =
        value(run_async(world.facade.login(&email, PASSWORD))).wrap_err("log user in")?;
    world.sessions.insert(email, session);
    Ok(())
}

#[given(r#"a board "{name}" created by "{email}""#)]
fn board_created_by(
    world: &mut KanbanWorld,
    name: String,
    email: String,
) -> Result<(), eyre::Report> {
    let session = world.session(&email)?;
    let view = value(run_async(world.facade.add_board(&session, &name)))
        .wrap_err("create scenario board")?;
    world.board = Some(view.key);
    Ok(())
}

#[given(r#""{email}" added the task "{title}""#)]
fn added_task(world: &mut KanbanWorld, email: String, title: String) -> Result<(), eyre::Report> {
    add_backlog_task(world, &email, &title)
}

#[given(r#"{count:usize} backlog tasks added by "{email}""#)]
fn backlog_tasks(world: &mut KanbanWorld, count: usize, email: String) -> Result<(), eyre::Report> {
    for index in 0..count {
        add_backlog_task(world, &email, &format!("Backlog task {index}"))?;
    }
    Ok(())
}

#[given(r#"{count:usize} task advanced to column {ordinal:usize} by "{email}""#)]
fn advanced_tasks(
    world: &mut KanbanWorld,
    count: usize,
    ordinal: usize,
    email: String,
) -> Result<(), eyre::Report> {
    let session = world.session(&email)?;
    let key = world.board()?;
    for index in 0..count {
        add_backlog_task(world, &email, &format!("Advanced task {index}"))?;
        let task = world.task()?;
        for from in 0..ordinal {
            value(run_async(
                world.facade.advance_task(&session, &key, task, from),
            ))
            .wrap_err("advance scenario task")?;
        }
    }
    Ok(())
}

#[given("column {ordinal:usize} is limited to {limit:usize} task")]
fn column_limited(world: &mut KanbanWorld, ordinal: usize, limit: usize) -> Result<(), eyre::Report> {
    let key = world.board()?;
    let session = world.session(key.creator.as_str())?;
    value(run_async(
        world.facade.limit_column(&session, &key, ordinal, limit),
    ))
    .wrap_err("limit scenario column")
}

fn add_backlog_task(world: &mut KanbanWorld, email: &str, title: &str) -> Result<(), eyre::Report> {
    let session = world.session(email)?;
    let key = world.board()?;
    let due = Utc::now() + Duration::days(1);
    let task = value(run_async(
        world.facade.add_task(&session, &key, title, "", due),
    ))
    .wrap_err("add scenario task")?;
    world.last_task = Some(task.id);
    Ok(())
}
