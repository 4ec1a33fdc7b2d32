//! `PostgreSQL` tests for user account persistence.

use kanban::user::domain::{Password, User};
use kanban::user::ports::{UserRepository, UserRepositoryError};
use mockable::DefaultClock;
use rstest::rstest;

use crate::postgres::helpers::{BoxError, PgContext, email, pg_context};

fn user(address: &str) -> Result<User, BoxError> {
    let password = Password::new("Secret99")?;
    Ok(User::register(email(address)?, &password, &DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_user_keeps_its_password_digest(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let alice = user("alice@example.com")?;

    context.users.store(&alice).await?;
    let found = context
        .users
        .find_by_email(alice.email())
        .await?
        .ok_or("user should be found")?;

    assert_eq!(found.email(), alice.email());
    assert_eq!(found.password_hash(), alice.password_hash());
    assert!(found.verify_password("Secret99"));
    assert!(!found.verify_password("Secret98"));
    assert!(
        context
            .users
            .find_by_email(&email("bob@example.com")?)
            .await?
            .is_none()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_rejected(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    let alice = user("alice@example.com")?;
    context.users.store(&alice).await?;

    let again = context.users.store(&user("alice@example.com")?).await;

    assert!(
        matches!(again, Err(UserRepositoryError::DuplicateUser(ref address)) if address == alice.email())
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_all_removes_every_user(
    pg_context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(context) = pg_context? else {
        return Ok(());
    };
    for address in ["alice@example.com", "bob@example.com"] {
        context.users.store(&user(address)?).await?;
    }
    assert_eq!(context.users.find_all().await?.len(), 2);

    context.users.delete_all().await?;

    assert!(context.users.find_all().await?.is_empty());
    Ok(())
}
