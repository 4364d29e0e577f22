//! BDD-style behavior tests for the User feature
//!
//! These tests verify user-related business behaviors work correctly.
//! Focus on business rules, not implementation details.

use sqlx::PgPool;
use user_feature::{CreateUserInput, UpdateUserInput, UserFeatureError, UserService};

fn new_user(email: &str, name: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_string(),
        name: name.to_string(),
    }
}

fn changes(email: &str, name: &str) -> UpdateUserInput {
    UpdateUserInput {
        email: email.to_string(),
        name: name.to_string(),
    }
}

// =============================================================================
// User Creation Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn user_can_be_created_with_email_and_name(pool: PgPool) -> Result<(), UserFeatureError> {
    let user = UserService::create(&pool, new_user("create@example.com", "Create Test")).await?;

    assert_eq!(user.email, "create@example.com");
    assert_eq!(user.name, "Create Test");
    assert!(user.id > 0);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn duplicate_email_is_rejected_without_side_effects(
    pool: PgPool,
) -> Result<(), UserFeatureError> {
    // Given an existing user
    UserService::create(&pool, new_user("duplicate@example.com", "First")).await?;

    // When another user is created with the same email
    let result = UserService::create(&pool, new_user("duplicate@example.com", "Second")).await;

    // Then the creation is rejected
    assert!(matches!(result, Err(UserFeatureError::EmailExists(_))));

    // And nothing was persisted by the failed attempt
    let users = UserService::list(&pool).await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "First");
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn invalid_input_reports_every_field(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::create(&pool, new_user("not-an-email", "")).await;

    match result {
        Err(UserFeatureError::Validation(failure)) => {
            assert_eq!(failure.fields(), vec!["email", "name"]);
        }
        other => panic!("Expected validation failure, got {:?}", other),
    }

    assert!(UserService::list(&pool).await?.is_empty());
    Ok(())
}

// =============================================================================
// User Query Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn user_can_be_found_by_id(pool: PgPool) -> Result<(), UserFeatureError> {
    let created = UserService::create(&pool, new_user("get@example.com", "Get Test")).await?;

    let found = UserService::get(&pool, created.id).await?;

    assert_eq!(found, created);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn querying_nonexistent_user_returns_not_found(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::get(&pool, 424242).await;

    assert!(matches!(result, Err(UserFeatureError::NotFound(424242))));
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn user_can_be_found_by_email(pool: PgPool) -> Result<(), UserFeatureError> {
    UserService::create(&pool, new_user("byemail@example.com", "Email Test")).await?;

    let found = UserService::get_by_email(&pool, "byemail@example.com").await?;

    assert!(found.is_some());
    assert_eq!(found.unwrap().name, "Email Test");
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn querying_nonexistent_email_returns_none(pool: PgPool) -> Result<(), UserFeatureError> {
    let found = UserService::get_by_email(&pool, "nonexistent@example.com").await?;
    assert!(found.is_none());
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn users_are_listed_in_insertion_order(pool: PgPool) -> Result<(), UserFeatureError> {
    UserService::create(&pool, new_user("list1@example.com", "List 1")).await?;
    UserService::create(&pool, new_user("list2@example.com", "List 2")).await?;
    UserService::create(&pool, new_user("list3@example.com", "List 3")).await?;

    let users = UserService::list(&pool).await?;

    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["List 1", "List 2", "List 3"]);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn listing_users_when_none_exist_returns_empty(pool: PgPool) -> Result<(), UserFeatureError> {
    let users = UserService::list(&pool).await?;
    assert!(users.is_empty());
    Ok(())
}

// =============================================================================
// User Update Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn user_email_and_name_can_be_updated(pool: PgPool) -> Result<(), UserFeatureError> {
    let created = UserService::create(&pool, new_user("update@example.com", "Original")).await?;

    let updated = UserService::update(
        &pool,
        created.id,
        changes("updated@example.com", "Updated"),
    )
    .await?;

    assert_eq!(updated.email, "updated@example.com");
    assert_eq!(updated.name, "Updated");
    // Identity and creation time are immutable
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn keeping_the_same_email_is_not_a_conflict(pool: PgPool) -> Result<(), UserFeatureError> {
    let created = UserService::create(&pool, new_user("same@example.com", "Before")).await?;

    let updated =
        UserService::update(&pool, created.id, changes("same@example.com", "After")).await?;

    assert_eq!(updated.email, "same@example.com");
    assert_eq!(updated.name, "After");
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn changing_email_to_a_taken_address_is_rejected(
    pool: PgPool,
) -> Result<(), UserFeatureError> {
    UserService::create(&pool, new_user("taken@example.com", "Owner")).await?;
    let other = UserService::create(&pool, new_user("other@example.com", "Other")).await?;

    let result = UserService::update(&pool, other.id, changes("taken@example.com", "Other")).await;

    assert!(matches!(result, Err(UserFeatureError::EmailExists(_))));

    // The rejected update left the user untouched
    let unchanged = UserService::get(&pool, other.id).await?;
    assert_eq!(unchanged.email, "other@example.com");
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn updating_nonexistent_user_fails(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::update(&pool, 424242, changes("ghost@example.com", "Ghost")).await;

    assert!(matches!(result, Err(UserFeatureError::NotFound(424242))));
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn update_with_invalid_input_is_rejected(pool: PgPool) -> Result<(), UserFeatureError> {
    let created = UserService::create(&pool, new_user("valid@example.com", "Valid")).await?;

    let result = UserService::update(&pool, created.id, changes("broken", "Valid")).await;

    assert!(matches!(result, Err(UserFeatureError::Validation(_))));
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn whitespace_only_name_is_rejected(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::create(&pool, new_user("blank@example.com", "   ")).await;

    match result {
        Err(UserFeatureError::Validation(failure)) => assert_eq!(failure.fields(), vec!["name"]),
        other => panic!("expected a validation failure, got {other:?}"),
    }
    assert!(UserService::list(&pool).await?.is_empty());

    let created = UserService::create(&pool, new_user("named@example.com", "Named")).await?;
    let result = UserService::update(&pool, created.id, changes("named@example.com", "\t")).await;
    assert!(matches!(result, Err(UserFeatureError::Validation(_))));
    Ok(())
}

// =============================================================================
// User Deletion Behaviors
// =============================================================================

#[sqlx::test(migrations = "../../../migrations")]
async fn user_can_be_deleted(pool: PgPool) -> Result<(), UserFeatureError> {
    let created = UserService::create(&pool, new_user("delete@example.com", "Delete Test")).await?;

    UserService::delete(&pool, created.id).await?;

    let result = UserService::get(&pool, created.id).await;
    assert!(matches!(result, Err(UserFeatureError::NotFound(_))));
    Ok(())
}

#[sqlx::test(migrations = "../../../migrations")]
async fn deleting_nonexistent_user_returns_not_found(pool: PgPool) -> Result<(), UserFeatureError> {
    let result = UserService::delete(&pool, 424242).await;

    assert!(matches!(result, Err(UserFeatureError::NotFound(424242))));
    Ok(())
}
