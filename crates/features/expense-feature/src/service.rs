use domain::validation::{DESCRIPTION_MAX_LENGTH, not_in_future, valid_amount};
use domain::{
    DateRange, DomainError, Expense, ExpenseCategory, ExpenseFields, ExpenseFilter,
    ExpenseRepository, ExpenseSort, ExpenseSortField, FieldViolation, NewExpense, Page,
    PageRequest, SortDirection, UserRepository, ValidationFailure,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use time::Date;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::ExpenseFeatureError;

/// Input for creating or updating an expense; every field is written
#[derive(Debug, Clone, Validate)]
pub struct ExpenseInput {
    #[validate(custom(function = "valid_amount"))]
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[validate(custom(function = "not_in_future"))]
    pub date: Date,
    #[validate(length(max = DESCRIPTION_MAX_LENGTH, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    pub user_id: i64,
}

impl ExpenseInput {
    fn into_fields(self) -> ExpenseFields {
        ExpenseFields {
            user_id: self.user_id,
            amount: self.amount,
            category: self.category,
            date: self.date,
            description: self.description,
        }
    }
}

/// Paging and ordering requested for an expense listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseListQuery {
    pub page: u32,
    pub size: u32,
    /// Defaults to `date` when absent
    pub sort_by: Option<String>,
    /// `ASC` or `DESC`; anything else sorts descending
    pub direction: Option<String>,
}

impl Default for ExpenseListQuery {
    fn default() -> Self {
        let page = PageRequest::default();
        Self {
            page: page.page(),
            size: page.size(),
            sort_by: None,
            direction: None,
        }
    }
}

impl ExpenseListQuery {
    /// Resolve into a page request and a sort, reporting every invalid parameter
    pub fn resolve(&self) -> Result<(PageRequest, ExpenseSort), ValidationFailure> {
        let mut violations = Vec::new();

        let page = PageRequest::new(self.page, self.size)
            .map_err(|failure| violations.extend_from_slice(failure.violations()))
            .ok();

        let field = match self.sort_by.as_deref() {
            None => Some(ExpenseSortField::default()),
            Some(name) => {
                let field = ExpenseSortField::parse(name);
                if field.is_none() {
                    violations.push(FieldViolation::new(
                        "sortBy",
                        format!("unsupported sort field {name:?}"),
                    ));
                }
                field
            }
        };

        let direction = self
            .direction
            .as_deref()
            .map(SortDirection::parse_or_default)
            .unwrap_or_default();

        match (page, field) {
            (Some(page), Some(field)) => Ok((page, ExpenseSort::new(field, direction))),
            _ => Err(ValidationFailure::new(violations)),
        }
    }
}

/// Service for expense-related operations
pub struct ExpenseService;

impl ExpenseService {
    /// Create a new expense for an existing user
    pub async fn create(pool: &PgPool, input: ExpenseInput) -> Result<Expense, ExpenseFeatureError> {
        input.validate().map_err(ValidationFailure::from)?;

        let mut tx = pool.begin().await.map_err(DomainError::from)?;

        // Verify user exists
        if !UserRepository::exists(&mut *tx, input.user_id).await? {
            warn!(user_id = input.user_id, "Rejected expense for unknown user");
            return Err(ExpenseFeatureError::UserNotFound(input.user_id));
        }

        let new_expense = NewExpense::new(input.into_fields());
        let id = ExpenseRepository::create(&mut *tx, &new_expense).await?;
        let expense = ExpenseRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or(ExpenseFeatureError::NotFound(id))?;

        tx.commit().await.map_err(DomainError::from)?;

        info!(expense_id = expense.id, user_id = expense.user_id, "Expense created");
        Ok(expense)
    }

    /// List a page of all expenses
    pub async fn list(
        pool: &PgPool,
        query: ExpenseListQuery,
    ) -> Result<Page<Expense>, ExpenseFeatureError> {
        let (request, sort) = query.resolve()?;

        let mut conn = pool.acquire().await.map_err(DomainError::from)?;
        let page =
            ExpenseRepository::find_page(&mut *conn, &ExpenseFilter::all(), sort, request).await?;

        debug!(
            page = page.page,
            size = page.size,
            total = page.total_elements,
            "Listed expenses"
        );
        Ok(page)
    }

    /// Get an expense by ID
    pub async fn get(pool: &PgPool, id: i64) -> Result<Expense, ExpenseFeatureError> {
        ExpenseRepository::find_by_id(pool, id)
            .await?
            .ok_or(ExpenseFeatureError::NotFound(id))
    }

    /// List a page of one user's expenses, newest date first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Page<Expense>, ExpenseFeatureError> {
        let request = PageRequest::new(page, size)?;

        let mut conn = pool.acquire().await.map_err(DomainError::from)?;
        if !UserRepository::exists(&mut *conn, user_id).await? {
            return Err(ExpenseFeatureError::UserNotFound(user_id));
        }

        let filter = ExpenseFilter::all().for_user(user_id);
        let page =
            ExpenseRepository::find_page(&mut *conn, &filter, ExpenseSort::by_date_desc(), request)
                .await?;

        debug!(user_id, total = page.total_elements, "Listed expenses for user");
        Ok(page)
    }

    /// List every expense dated within an inclusive range
    pub async fn list_by_date_range(
        pool: &PgPool,
        start: Date,
        end: Date,
    ) -> Result<Vec<Expense>, ExpenseFeatureError> {
        let filter = ExpenseFilter::all().within(DateRange::new(start, end));
        let expenses = ExpenseRepository::list(pool, &filter).await?;

        debug!(%start, %end, count = expenses.len(), "Listed expenses by date range");
        Ok(expenses)
    }

    /// List one user's expenses dated within an inclusive range
    pub async fn list_for_user_by_date_range(
        pool: &PgPool,
        user_id: i64,
        start: Date,
        end: Date,
    ) -> Result<Vec<Expense>, ExpenseFeatureError> {
        let mut conn = pool.acquire().await.map_err(DomainError::from)?;
        if !UserRepository::exists(&mut *conn, user_id).await? {
            return Err(ExpenseFeatureError::UserNotFound(user_id));
        }

        let filter = ExpenseFilter::all()
            .for_user(user_id)
            .within(DateRange::new(start, end));
        let expenses = ExpenseRepository::list(&mut *conn, &filter).await?;

        debug!(user_id, %start, %end, count = expenses.len(), "Listed user expenses by date range");
        Ok(expenses)
    }

    /// Overwrite every field of an expense, re-checking the owner when it changes
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: ExpenseInput,
    ) -> Result<Expense, ExpenseFeatureError> {
        input.validate().map_err(ValidationFailure::from)?;

        let mut tx = pool.begin().await.map_err(DomainError::from)?;

        let existing = ExpenseRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or(ExpenseFeatureError::NotFound(id))?;

        if existing.user_id != input.user_id
            && !UserRepository::exists(&mut *tx, input.user_id).await?
        {
            warn!(expense_id = id, user_id = input.user_id, "Rejected move to unknown user");
            return Err(ExpenseFeatureError::UserNotFound(input.user_id));
        }

        let fields = input.into_fields();
        if !ExpenseRepository::update(&mut *tx, id, &fields).await? {
            return Err(ExpenseFeatureError::NotFound(id));
        }
        let expense = ExpenseRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or(ExpenseFeatureError::NotFound(id))?;

        tx.commit().await.map_err(DomainError::from)?;

        info!(
            expense_id = id,
            user_id = expense.user_id,
            owner_changed = existing.user_id != expense.user_id,
            "Expense updated"
        );
        Ok(expense)
    }

    /// Delete an expense
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), ExpenseFeatureError> {
        if !ExpenseRepository::delete(pool, id).await? {
            return Err(ExpenseFeatureError::NotFound(id));
        }

        info!(expense_id = id, "Expense deleted");
        Ok(())
    }
}
