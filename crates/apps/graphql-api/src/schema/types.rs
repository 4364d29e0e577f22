use async_graphql::{Enum, InputObject, SimpleObject};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

/// GraphQL representation of a User
#[derive(SimpleObject)]
pub struct UserType {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: OffsetDateTime,
}

impl From<domain::User> for UserType {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// GraphQL representation of an Expense
#[derive(SimpleObject)]
pub struct ExpenseType {
    pub id: i64,
    pub amount: Decimal,
    pub category: ExpenseCategoryType,
    pub date: Date,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub user_id: i64,
    /// The owner's name at the time of the query
    pub user_name: String,
}

impl From<domain::Expense> for ExpenseType {
    fn from(expense: domain::Expense) -> Self {
        Self {
            id: expense.id,
            amount: expense.amount,
            category: expense.category.into(),
            date: expense.date,
            description: expense.description,
            created_at: expense.created_at,
            user_id: expense.user_id,
            user_name: expense.user_name,
        }
    }
}

/// A page of expenses with its totals
#[derive(SimpleObject)]
pub struct ExpensePageType {
    pub content: Vec<ExpenseType>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl From<domain::Page<domain::Expense>> for ExpensePageType {
    fn from(page: domain::Page<domain::Expense>) -> Self {
        let last = page.is_last();
        let page = page.map(ExpenseType::from);
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            last,
        }
    }
}

/// GraphQL enum for expense categories
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum ExpenseCategoryType {
    Food,
    Transport,
    Leisure,
    Other,
}

impl From<domain::ExpenseCategory> for ExpenseCategoryType {
    fn from(category: domain::ExpenseCategory) -> Self {
        match category {
            domain::ExpenseCategory::Food => ExpenseCategoryType::Food,
            domain::ExpenseCategory::Transport => ExpenseCategoryType::Transport,
            domain::ExpenseCategory::Leisure => ExpenseCategoryType::Leisure,
            domain::ExpenseCategory::Other => ExpenseCategoryType::Other,
        }
    }
}

impl From<ExpenseCategoryType> for domain::ExpenseCategory {
    fn from(category: ExpenseCategoryType) -> Self {
        match category {
            ExpenseCategoryType::Food => domain::ExpenseCategory::Food,
            ExpenseCategoryType::Transport => domain::ExpenseCategory::Transport,
            ExpenseCategoryType::Leisure => domain::ExpenseCategory::Leisure,
            ExpenseCategoryType::Other => domain::ExpenseCategory::Other,
        }
    }
}

/// Input for creating a user
#[derive(InputObject)]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
}

/// Input for updating a user; both fields are replaced
#[derive(InputObject)]
pub struct UpdateUserInput {
    pub email: String,
    pub name: String,
}

/// Input for creating or updating an expense
#[derive(InputObject)]
pub struct ExpenseInput {
    pub amount: Decimal,
    pub category: ExpenseCategoryType,
    pub date: Date,
    pub description: Option<String>,
    pub user_id: i64,
}

impl From<ExpenseInput> for expense_feature::ExpenseInput {
    fn from(input: ExpenseInput) -> Self {
        Self {
            amount: input.amount,
            category: input.category.into(),
            date: input.date,
            description: input.description,
            user_id: input.user_id,
        }
    }
}
