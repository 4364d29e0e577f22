use async_graphql::{Context, Object, Result};
use domain::pagination::DEFAULT_PAGE_SIZE;
use expense_feature::{ExpenseFeatureError, ExpenseListQuery, ExpenseService};
use sqlx::PgPool;
use time::Date;
use user_feature::{UserFeatureError, UserService};

use super::errors::{expense_error, user_error};
use super::types::{ExpensePageType, ExpenseType, UserType};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: i64) -> Result<Option<UserType>> {
        let pool = ctx.data::<PgPool>()?;
        match UserService::get(pool, id).await {
            Ok(user) => Ok(Some(user.into())),
            Err(UserFeatureError::NotFound(_)) => Ok(None),
            Err(err) => Err(user_error(err)),
        }
    }

    /// Get a user by email
    async fn user_by_email(&self, ctx: &Context<'_>, email: String) -> Result<Option<UserType>> {
        let pool = ctx.data::<PgPool>()?;
        let user = UserService::get_by_email(pool, &email)
            .await
            .map_err(user_error)?;
        Ok(user.map(Into::into))
    }

    /// List all users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserType>> {
        let pool = ctx.data::<PgPool>()?;
        let users = UserService::list(pool).await.map_err(user_error)?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Get an expense by ID
    async fn expense(&self, ctx: &Context<'_>, id: i64) -> Result<Option<ExpenseType>> {
        let pool = ctx.data::<PgPool>()?;
        match ExpenseService::get(pool, id).await {
            Ok(expense) => Ok(Some(expense.into())),
            Err(ExpenseFeatureError::NotFound(_)) => Ok(None),
            Err(err) => Err(expense_error(err)),
        }
    }

    /// List a page of all expenses
    async fn expenses(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 0)] page: u32,
        #[graphql(default_with = "DEFAULT_PAGE_SIZE")] size: u32,
        #[graphql(default_with = "String::from(\"date\")")] sort_by: String,
        #[graphql(default_with = "String::from(\"DESC\")")] direction: String,
    ) -> Result<ExpensePageType> {
        let pool = ctx.data::<PgPool>()?;
        let query = ExpenseListQuery {
            page,
            size,
            sort_by: Some(sort_by),
            direction: Some(direction),
        };
        let expenses = ExpenseService::list(pool, query)
            .await
            .map_err(expense_error)?;
        Ok(expenses.into())
    }

    /// List a page of one user's expenses, newest first
    async fn expenses_for_user(
        &self,
        ctx: &Context<'_>,
        user_id: i64,
        #[graphql(default = 0)] page: u32,
        #[graphql(default_with = "DEFAULT_PAGE_SIZE")] size: u32,
    ) -> Result<ExpensePageType> {
        let pool = ctx.data::<PgPool>()?;
        let expenses = ExpenseService::list_for_user(pool, user_id, page, size)
            .await
            .map_err(expense_error)?;
        Ok(expenses.into())
    }

    /// List every expense dated within an inclusive range
    async fn expenses_by_date_range(
        &self,
        ctx: &Context<'_>,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<ExpenseType>> {
        let pool = ctx.data::<PgPool>()?;
        let expenses = ExpenseService::list_by_date_range(pool, start_date, end_date)
            .await
            .map_err(expense_error)?;
        Ok(expenses.into_iter().map(Into::into).collect())
    }

    /// List one user's expenses dated within an inclusive range
    async fn expenses_for_user_by_date_range(
        &self,
        ctx: &Context<'_>,
        user_id: i64,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<ExpenseType>> {
        let pool = ctx.data::<PgPool>()?;
        let expenses =
            ExpenseService::list_for_user_by_date_range(pool, user_id, start_date, end_date)
                .await
                .map_err(expense_error)?;
        Ok(expenses.into_iter().map(Into::into).collect())
    }
}
