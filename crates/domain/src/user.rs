use sqlx::{Executor, FromRow, Postgres};
use time::OffsetDateTime;

use crate::DomainError;

/// User entity
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// A user that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub created_at: OffsetDateTime,
}

impl NewUser {
    /// Stamp a new user with the current time
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Repository for User operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user
    pub async fn create<'e, E>(executor: E, user: &NewUser) -> Result<User, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.created_at)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email<'e, E>(
        executor: E,
        email: &str,
    ) -> Result<Option<User>, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Check whether a user with the given ID exists
    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// List all users in insertion order
    pub async fn list<'e, E>(executor: E) -> Result<Vec<User>, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    /// Overwrite a user's email and name
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        email: &str,
        name: &str,
    ) -> Result<Option<User>, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $1, name = $2
            WHERE id = $3
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Delete a user by ID
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, DomainError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
