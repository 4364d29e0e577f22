use domain::ValidationFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserFeatureError {
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("User not found with id: {0}")]
    NotFound(i64),

    #[error("A user with email {0} already exists")]
    EmailExists(String),

    #[error("Invalid user input: {0}")]
    Validation(#[from] ValidationFailure),
}
