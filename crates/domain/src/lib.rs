pub mod error;
pub mod expense;
pub mod pagination;
pub mod user;
pub mod validation;

pub use error::DomainError;
pub use expense::{
    DateRange, Expense, ExpenseCategory, ExpenseFields, ExpenseFilter, ExpenseRepository,
    ExpenseSort, ExpenseSortField, NewExpense,
};
pub use pagination::{Page, PageRequest, SortDirection};
pub use user::{NewUser, User, UserRepository};
pub use validation::{FieldViolation, ValidationFailure};
