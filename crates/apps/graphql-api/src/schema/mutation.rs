use async_graphql::{Context, Object, Result};
use expense_feature::ExpenseService;
use sqlx::PgPool;
use user_feature::UserService;

use super::errors::{expense_error, user_error};
use super::types::{CreateUserInput, ExpenseInput, ExpenseType, UpdateUserInput, UserType};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new user with a unique email
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<UserType> {
        let pool = ctx.data::<PgPool>()?;
        let user = UserService::create(
            pool,
            user_feature::CreateUserInput {
                email: input.email,
                name: input.name,
            },
        )
        .await
        .map_err(user_error)?;
        Ok(user.into())
    }

    /// Replace a user's email and name
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: UpdateUserInput,
    ) -> Result<UserType> {
        let pool = ctx.data::<PgPool>()?;
        let user = UserService::update(
            pool,
            id,
            user_feature::UpdateUserInput {
                email: input.email,
                name: input.name,
            },
        )
        .await
        .map_err(user_error)?;
        Ok(user.into())
    }

    /// Delete a user and all of their expenses
    async fn delete_user(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let pool = ctx.data::<PgPool>()?;
        UserService::delete(pool, id).await.map_err(user_error)?;
        Ok(true)
    }

    /// Record a new expense
    async fn create_expense(&self, ctx: &Context<'_>, input: ExpenseInput) -> Result<ExpenseType> {
        let pool = ctx.data::<PgPool>()?;
        let expense = ExpenseService::create(pool, input.into())
            .await
            .map_err(expense_error)?;
        Ok(expense.into())
    }

    /// Replace every field of an expense
    async fn update_expense(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: ExpenseInput,
    ) -> Result<ExpenseType> {
        let pool = ctx.data::<PgPool>()?;
        let expense = ExpenseService::update(pool, id, input.into())
            .await
            .map_err(expense_error)?;
        Ok(expense.into())
    }

    /// Delete an expense
    async fn delete_expense(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let pool = ctx.data::<PgPool>()?;
        ExpenseService::delete(pool, id)
            .await
            .map_err(expense_error)?;
        Ok(true)
    }
}
