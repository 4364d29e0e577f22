use domain::ValidationFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpenseFeatureError {
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Expense not found with id: {0}")]
    NotFound(i64),

    #[error("User not found with id: {0}")]
    UserNotFound(i64),

    #[error("Invalid expense input: {0}")]
    Validation(#[from] ValidationFailure),
}
