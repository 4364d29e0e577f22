use domain::validation::not_blank;
use domain::{DomainError, ExpenseRepository, NewUser, User, UserRepository, ValidationFailure};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::UserFeatureError;

/// Input for creating a new user
#[derive(Debug, Clone, Validate)]
pub struct CreateUserInput {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

/// Input for updating a user; both fields are overwritten
#[derive(Debug, Clone, Validate)]
pub struct UpdateUserInput {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

/// Report a unique-constraint rejection from the store as a taken email
fn email_conflict(error: DomainError, email: &str) -> UserFeatureError {
    if error.is_unique_violation() {
        UserFeatureError::EmailExists(email.to_string())
    } else {
        UserFeatureError::Domain(error)
    }
}

/// Service for user-related operations
pub struct UserService;

impl UserService {
    /// Create a new user with a unique email
    pub async fn create(pool: &PgPool, input: CreateUserInput) -> Result<User, UserFeatureError> {
        input.validate().map_err(ValidationFailure::from)?;

        let mut tx = pool.begin().await.map_err(DomainError::from)?;

        if UserRepository::find_by_email(&mut *tx, &input.email)
            .await?
            .is_some()
        {
            warn!(email = %input.email, "Rejected user with duplicate email");
            return Err(UserFeatureError::EmailExists(input.email));
        }

        let new_user = NewUser::new(input.email, input.name);
        let user = UserRepository::create(&mut *tx, &new_user)
            .await
            .map_err(|e| email_conflict(e, &new_user.email))?;

        tx.commit().await.map_err(DomainError::from)?;

        info!(user_id = user.id, email = %user.email, "User created");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(pool: &PgPool, id: i64) -> Result<User, UserFeatureError> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or(UserFeatureError::NotFound(id))
    }

    /// Get a user by email
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, UserFeatureError> {
        Ok(UserRepository::find_by_email(pool, email).await?)
    }

    /// List all users in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, UserFeatureError> {
        let users = UserRepository::list(pool).await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Overwrite a user's email and name
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: UpdateUserInput,
    ) -> Result<User, UserFeatureError> {
        input.validate().map_err(ValidationFailure::from)?;

        let mut tx = pool.begin().await.map_err(DomainError::from)?;

        let existing = UserRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or(UserFeatureError::NotFound(id))?;

        if existing.email != input.email {
            let owner = UserRepository::find_by_email(&mut *tx, &input.email).await?;
            if owner.is_some_and(|other| other.id != id) {
                warn!(user_id = id, email = %input.email, "Rejected email change to a taken address");
                return Err(UserFeatureError::EmailExists(input.email));
            }
        }

        let user = UserRepository::update(&mut *tx, id, &input.email, &input.name)
            .await
            .map_err(|e| email_conflict(e, &input.email))?
            .ok_or(UserFeatureError::NotFound(id))?;

        tx.commit().await.map_err(DomainError::from)?;

        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Delete a user together with every expense it owns
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), UserFeatureError> {
        let mut tx = pool.begin().await.map_err(DomainError::from)?;

        if !UserRepository::exists(&mut *tx, id).await? {
            return Err(UserFeatureError::NotFound(id));
        }

        let removed_expenses = ExpenseRepository::delete_by_user(&mut *tx, id).await?;
        UserRepository::delete(&mut *tx, id).await?;

        tx.commit().await.map_err(DomainError::from)?;

        info!(user_id = id, removed_expenses, "User deleted");
        Ok(())
    }
}
